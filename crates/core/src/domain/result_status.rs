/// Approval lifecycle of a stored result. Transitions happen outside the
/// calculator; a recompute never changes the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultStatus {
    #[default]
    Pending,
    Approved,
    Frozen,
}

impl ResultStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultStatus::Pending => "pending",
            ResultStatus::Approved => "approved",
            ResultStatus::Frozen => "frozen",
        }
    }
}

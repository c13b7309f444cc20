//! System prompt for the report generator

/// Template name of the system instruction
pub const REPORT_SYSTEM: &str = "stock.report.system";

/// Role framing sent ahead of every report request
pub(crate) const REPORT_SYSTEM_TEMPLATE: &str = "You are a professional stock report generator.";

pub mod panels;
pub mod plot;
pub mod views;

/// Top-level page chosen in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    ExecutiveSummary,
    RegionalDeepDive,
    ConstituencyAnalysis,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [
        ViewMode::ExecutiveSummary,
        ViewMode::RegionalDeepDive,
        ViewMode::ConstituencyAnalysis,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::ExecutiveSummary => "Executive Summary",
            ViewMode::RegionalDeepDive => "Regional Deep-Dive",
            ViewMode::ConstituencyAnalysis => "Constituency Analysis",
        }
    }
}

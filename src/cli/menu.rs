/// Entries of the numbered main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    AddExpense,
    ViewExpenses,
    FilterByCategory,
    ViewRemaining,
    GenerateReport,
    ExportCsv,
    ImportCsv,
    Exit,
}

impl MenuCommand {
    pub const ALL: [MenuCommand; 8] = [
        MenuCommand::AddExpense,
        MenuCommand::ViewExpenses,
        MenuCommand::FilterByCategory,
        MenuCommand::ViewRemaining,
        MenuCommand::GenerateReport,
        MenuCommand::ExportCsv,
        MenuCommand::ImportCsv,
        MenuCommand::Exit,
    ];

    pub fn number(&self) -> u8 {
        match self {
            MenuCommand::AddExpense => 1,
            MenuCommand::ViewExpenses => 2,
            MenuCommand::FilterByCategory => 3,
            MenuCommand::ViewRemaining => 4,
            MenuCommand::GenerateReport => 5,
            MenuCommand::ExportCsv => 6,
            MenuCommand::ImportCsv => 7,
            MenuCommand::Exit => 8,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuCommand::AddExpense => "Add an expense",
            MenuCommand::ViewExpenses => "View expenses",
            MenuCommand::FilterByCategory => "Filter expenses by category",
            MenuCommand::ViewRemaining => "View remaining budget",
            MenuCommand::GenerateReport => "Generate financial report",
            MenuCommand::ExportCsv => "Export expenses to CSV",
            MenuCommand::ImportCsv => "Import expenses from CSV",
            MenuCommand::Exit => "Exit",
        }
    }

    /// Map the user's menu answer ("1".."8") to a command.
    pub fn parse(choice: &str) -> Option<Self> {
        let number: u8 = choice.trim().parse().ok()?;
        Self::ALL.into_iter().find(|c| c.number() == number)
    }
}

pub mod roster;
pub mod validate;

pub use roster::{load_roster, load_roster_records, RosterError, RosterRecord};
pub use validate::{validate_roster, validate_roster_file, ValidationReport, ValidationSeverity};

pub mod entry_form;
pub mod ledger;
pub mod totals;

//! SSA.gov statement extraction.
//!
//! Reads the XML export offered by the "my Social Security" site and pulls
//! out the account holder's name and the yearly earnings record.
//!
//! # Example
//!
//! ```no_run
//! use ssa_earnings::statement::StatementParser;
//!
//! let statement = StatementParser::open("Statement.xml")?.parse()?;
//!
//! for record in &statement.earnings {
//!     println!("{:?}: {:?}", record.year, record.fica_earnings);
//! }
//! # Ok::<(), ssa_earnings::Error>(())
//! ```

mod parser;

pub use parser::StatementParser;

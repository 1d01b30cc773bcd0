use std::fmt;
use std::io;


#[derive(Debug)]
pub enum Error {
	Io(io::Error),
	Csv(csv::Error),
	MissingColumn{table: &'static str, column: &'static str},
	InvalidMetric(String),
	Config{key: &'static str, reason: String},
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Io(e) => fmt::Display::fmt(e, f),
			Self::Csv(e) => fmt::Display::fmt(e, f),
			Self::MissingColumn{table, column} => write!(f, "{} table lacks required column {:?}", table, column),
			Self::InvalidMetric(name) => write!(f, "unknown metric {:?}", name),
			Self::Config{key, reason} => write!(f, "invalid {}: {}", key, reason),
		}
	}
}

impl From<io::Error> for Error {
	fn from(err: io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<csv::Error> for Error {
	fn from(err: csv::Error) -> Self {
		Self::Csv(err)
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Io(e) => Some(e),
			Self::Csv(e) => Some(e),
			_ => None,
		}
	}
}

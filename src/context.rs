use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};

use smartstring::alias::{String as SmartString};

use enum_map::Enum;

use chrono::naive::NaiveDate;

use log::warn;

use super::error::Error;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Enum)]
pub enum Metric {
	Confirmed,
	Active,
	Recovered,
	Deaths,
}

impl Metric {
	pub const ALL: [Metric; 4] = [
		Self::Confirmed,
		Self::Active,
		Self::Recovered,
		Self::Deaths,
	];

	/// Series order of the aggregate timeline.
	pub const TIMELINE: [Metric; 4] = [
		Self::Confirmed,
		Self::Recovered,
		Self::Active,
		Self::Deaths,
	];

	pub fn name(&self) -> &'static str {
		match self {
			Self::Confirmed => "Confirmed",
			Self::Active => "Active",
			Self::Recovered => "Recovered",
			Self::Deaths => "Deaths",
		}
	}

	pub fn series_name(&self, per_capita: bool) -> &'static str {
		match (self, per_capita) {
			(_, false) => self.name(),
			(Self::Confirmed, true) => "ConfirmedPerCapita",
			(Self::Active, true) => "ActivePerCapita",
			(Self::Recovered, true) => "RecoveredPerCapita",
			(Self::Deaths, true) => "DeathsPerCapita",
		}
	}

	pub fn default_color(&self) -> Option<&'static str> {
		match self {
			Self::Confirmed => Some("#6195d2"),
			Self::Active => Some("#2B34B9"),
			Self::Recovered => Some("#BC472A"),
			Self::Deaths => None,
		}
	}
}

impl fmt::Display for Metric {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Metric {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		for metric in Self::ALL.iter() {
			if metric.name().eq_ignore_ascii_case(s) {
				return Ok(*metric)
			}
		}
		Err(Error::InvalidMetric(s.into()))
	}
}

pub static LINE_PALETTE: [&'static str; 8] = [
	"#185d6a",
	"#385e4c",
	"#597043",
	"#7a8339",
	"#9b9530",
	"#bca727",
	"#ddb91e",
	"#ffcc14",
];


fn observation_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
	where D: Deserializer<'de>
{
	let mut s = String::deserialize(deserializer)?;
	if s.len() == 19 {
		// ISO date with a midnight time part
		if !s.is_char_boundary(10) {
			return Err(de::Error::custom(format!("unrecognized date: {:?}", s)))
		}
		s.truncate(10);
	}
	if s.len() == 10 && s.as_bytes()[4] == b'-' {
		return s.parse::<NaiveDate>().map_err(de::Error::custom)
	}
	// M/D/YY as used by the older dumps, occasionally with a full year
	let year_len = match s.rsplit_once('/') {
		Some((_, year)) => year.len(),
		None => return Err(de::Error::custom(format!("unrecognized date: {:?}", s))),
	};
	let fmt = if year_len == 4 {
		"%m/%d/%Y"
	} else {
		"%m/%d/%y"
	};
	NaiveDate::parse_from_str(&s, fmt).map_err(de::Error::custom)
}


fn lenient_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
	where D: Deserializer<'de>
{
	let s = String::deserialize(deserializer)?;
	let s = s.trim();
	if let Ok(v) = s.parse::<i64>() {
		return Ok(v)
	}
	// pandas exports integer columns containing gaps as floats
	let v = s.parse::<f64>().map_err(de::Error::custom)?;
	if !v.is_finite() || v.fract() != 0.0 {
		return Err(de::Error::custom(format!("not a whole count: {:?}", s)))
	}
	Ok(v as i64)
}


fn maybe_population<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
	where D: Deserializer<'de>
{
	let s = String::deserialize(deserializer)?;
	let s = s.trim();
	if s.is_empty() || s.eq_ignore_ascii_case("nan") {
		return Ok(None)
	}
	match s.parse::<f64>() {
		Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v.round() as u64)),
		_ => {
			warn!("treating unusable population value {:?} as missing", s);
			Ok(None)
		},
	}
}


#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawObservation {
	#[serde(rename = "Province/State")]
	pub province: Option<SmartString>,
	#[serde(rename = "Country/Region")]
	pub region: SmartString,
	#[serde(rename = "Lat")]
	pub latitude: f64,
	#[serde(rename = "Long")]
	pub longitude: f64,
	#[serde(rename = "Date", deserialize_with = "observation_date")]
	pub date: NaiveDate,
	#[serde(rename = "Confirmed", deserialize_with = "lenient_count")]
	pub confirmed: i64,
	#[serde(rename = "Recovered", deserialize_with = "lenient_count")]
	pub recovered: i64,
	#[serde(rename = "Deaths", deserialize_with = "lenient_count")]
	pub deaths: i64,
}

impl RawObservation {
	pub const COLUMNS: [&'static str; 8] = [
		"Province/State",
		"Country/Region",
		"Lat",
		"Long",
		"Date",
		"Confirmed",
		"Recovered",
		"Deaths",
	];
}


#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationRecord {
	#[serde(rename = "Country")]
	pub country: SmartString,
	#[serde(rename = "Population", deserialize_with = "maybe_population")]
	pub population: Option<u64>,
}

impl PopulationRecord {
	pub const COLUMNS: [&'static str; 2] = [
		"Country",
		"Population",
	];
}

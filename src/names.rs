use std::fmt;

use smartstring::alias::{String as SmartString};


/// Maps the dataset's region names onto the names used for joining and
/// display. Every name not listed here passes through unchanged.
pub fn normalize_country(name: &str) -> &str {
	match name {
		"US" => "United States",
		"Korea, South" => "South Korea",
		"Taiwan*" => "Taiwan*",
		other => other,
	}
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Continent {
	Africa,
	Antarctica,
	Asia,
	Europe,
	NorthAmerica,
	Oceania,
	SouthAmerica,
}

impl Continent {
	pub fn code(&self) -> &'static str {
		match self {
			Self::Africa => "AF",
			Self::Antarctica => "AN",
			Self::Asia => "AS",
			Self::Europe => "EU",
			Self::NorthAmerica => "NA",
			Self::Oceania => "OC",
			Self::SouthAmerica => "SA",
		}
	}
}

impl fmt::Display for Continent {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.code())
	}
}


/// A country name for which no continent is known. Carries the name so it
/// can stand in for the continent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unclassified(pub SmartString);

impl fmt::Display for Unclassified {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "no continent known for {:?}", self.0)
	}
}

impl std::error::Error for Unclassified {}


pub fn classify_continent(country: &str) -> Result<Continent, Unclassified> {
	match country {
		"Algeria" | "Angola" | "Benin" | "Botswana" | "Burkina Faso"
		| "Burundi" | "Cabo Verde" | "Cape Verde" | "Cameroon"
		| "Central African Republic" | "Chad" | "Comoros" | "Congo"
		| "Congo (Brazzaville)" | "Congo (Kinshasa)" | "Republic of the Congo"
		| "Democratic Republic of the Congo" | "Congo, The Democratic Republic of the"
		| "Cote d'Ivoire" | "Côte d'Ivoire" | "Ivory Coast" | "Djibouti" | "Egypt"
		| "Equatorial Guinea" | "Eritrea" | "Eswatini" | "Swaziland" | "Ethiopia"
		| "Gabon" | "Gambia" | "Gambia, The" | "The Gambia" | "Ghana" | "Guinea"
		| "Guinea-Bissau" | "Kenya" | "Lesotho" | "Liberia" | "Libya"
		| "Madagascar" | "Malawi" | "Mali" | "Mauritania" | "Mauritius"
		| "Mayotte" | "Morocco" | "Mozambique" | "Namibia" | "Niger" | "Nigeria"
		| "Reunion" | "Réunion" | "Rwanda" | "Saint Helena" | "Sao Tome and Principe"
		| "Senegal" | "Seychelles" | "Sierra Leone" | "Somalia" | "South Africa"
		| "South Sudan" | "Sudan" | "Tanzania" | "Tanzania, United Republic of"
		| "Togo" | "Tunisia" | "Uganda" | "Western Sahara" | "Zambia" | "Zimbabwe"
			=> Ok(Continent::Africa),

		"Antarctica" | "Bouvet Island" | "French Southern Territories"
		| "Heard Island and McDonald Islands" | "South Georgia and the South Sandwich Islands"
			=> Ok(Continent::Antarctica),

		"Afghanistan" | "Armenia" | "Azerbaijan" | "Bahrain" | "Bangladesh"
		| "Bhutan" | "Brunei" | "Brunei Darussalam" | "Burma" | "Myanmar"
		| "Cambodia" | "China" | "Mainland China" | "Cyprus" | "Georgia"
		| "Hong Kong" | "India" | "Indonesia" | "Iran" | "Iran, Islamic Republic of"
		| "Iraq" | "Israel" | "Japan" | "Jordan" | "Kazakhstan" | "Kuwait"
		| "Kyrgyzstan" | "Laos" | "Lao People's Democratic Republic" | "Lebanon"
		| "Macau" | "Macao" | "Malaysia" | "Maldives" | "Mongolia" | "Nepal"
		| "North Korea" | "Korea, Democratic People's Republic of" | "Oman"
		| "Pakistan" | "Palestine" | "Palestine, State of" | "Philippines"
		| "Qatar" | "Saudi Arabia" | "Singapore" | "South Korea" | "Korea, Republic of"
		| "Sri Lanka" | "Syria" | "Syrian Arab Republic" | "Taiwan"
		| "Taiwan, Province of China" | "Tajikistan" | "Thailand" | "Timor-Leste"
		| "East Timor" | "Turkey" | "Turkmenistan" | "United Arab Emirates"
		| "Uzbekistan" | "Vietnam" | "Viet Nam" | "Yemen"
			=> Ok(Continent::Asia),

		"Albania" | "Andorra" | "Austria" | "Belarus" | "Belgium"
		| "Bosnia and Herzegovina" | "Bulgaria" | "Croatia" | "Czechia"
		| "Czech Republic" | "Denmark" | "Estonia" | "Faroe Islands" | "Finland"
		| "France" | "Germany" | "Gibraltar" | "Greece" | "Guernsey" | "Holy See"
		| "Vatican City" | "Hungary" | "Iceland" | "Ireland" | "Isle of Man" | "Italy"
		| "Jersey" | "Latvia" | "Liechtenstein" | "Lithuania" | "Luxembourg"
		| "Malta" | "Moldova" | "Moldova, Republic of" | "Monaco" | "Montenegro"
		| "Netherlands" | "North Macedonia" | "Macedonia" | "Norway" | "Poland"
		| "Portugal" | "Romania" | "Russia" | "Russian Federation" | "San Marino"
		| "Serbia" | "Slovakia" | "Slovenia" | "Spain" | "Sweden" | "Switzerland"
		| "Ukraine" | "United Kingdom" | "UK"
			=> Ok(Continent::Europe),

		"Anguilla" | "Antigua and Barbuda" | "Aruba" | "Bahamas" | "Bahamas, The"
		| "The Bahamas" | "Barbados" | "Belize" | "Bermuda" | "Canada"
		| "Cayman Islands" | "Costa Rica" | "Cuba" | "Curacao" | "Curaçao" | "Dominica"
		| "Dominican Republic" | "El Salvador" | "Greenland" | "Grenada"
		| "Guadeloupe" | "Guatemala" | "Haiti" | "Honduras" | "Jamaica"
		| "Martinique" | "Mexico" | "Montserrat" | "Nicaragua" | "Panama"
		| "Puerto Rico" | "Saint Barthelemy" | "Saint Kitts and Nevis" | "Saint Lucia"
		| "Saint Martin" | "Saint Pierre and Miquelon" | "Saint Vincent and the Grenadines"
		| "Sint Maarten" | "Trinidad and Tobago" | "Turks and Caicos Islands"
		| "United States" | "Virgin Islands, British" | "Virgin Islands, U.S."
			=> Ok(Continent::NorthAmerica),

		"American Samoa" | "Australia" | "Cook Islands" | "Fiji" | "French Polynesia"
		| "Guam" | "Kiribati" | "Marshall Islands" | "Micronesia" | "Nauru"
		| "New Caledonia" | "New Zealand" | "Niue" | "Northern Mariana Islands"
		| "Palau" | "Papua New Guinea" | "Samoa" | "Solomon Islands" | "Tonga"
		| "Tuvalu" | "Vanuatu" | "Wallis and Futuna"
			=> Ok(Continent::Oceania),

		"Argentina" | "Bolivia" | "Bolivia, Plurinational State of" | "Brazil"
		| "Chile" | "Colombia" | "Ecuador" | "Falkland Islands" | "French Guiana"
		| "Guyana" | "Paraguay" | "Peru" | "Suriname" | "Uruguay" | "Venezuela"
		| "Venezuela, Bolivarian Republic of"
			=> Ok(Continent::SouthAmerica),

		other => Err(Unclassified(other.into())),
	}
}


/// Continent code for `country`, or `country` itself when unclassified.
pub fn continent_label(country: &str) -> SmartString {
	match classify_continent(country) {
		Ok(continent) => continent.code().into(),
		Err(Unclassified(name)) => name,
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalizes_listed_names_only() {
		assert_eq!(normalize_country("US"), "United States");
		assert_eq!(normalize_country("Korea, South"), "South Korea");
		assert_eq!(normalize_country("Taiwan*"), "Taiwan*");
		assert_eq!(normalize_country("Germany"), "Germany");
		assert_eq!(normalize_country("us"), "us");
		assert_eq!(normalize_country(""), "");
	}

	#[test]
	fn normalization_is_idempotent() {
		for name in ["US", "Korea, South", "Italy", "Taiwan*"].iter() {
			let once = normalize_country(name);
			assert_eq!(normalize_country(once), once);
		}
	}

	#[test]
	fn classifies_normalized_names() {
		assert_eq!(classify_continent("United States"), Ok(Continent::NorthAmerica));
		assert_eq!(classify_continent("South Korea"), Ok(Continent::Asia));
		assert_eq!(classify_continent("Italy"), Ok(Continent::Europe));
		assert_eq!(classify_continent("Brazil"), Ok(Continent::SouthAmerica));
		assert_eq!(classify_continent("Congo (Kinshasa)"), Ok(Continent::Africa));
		assert_eq!(classify_continent("New Zealand"), Ok(Continent::Oceania));
	}

	#[test]
	fn unclassified_names_fall_back_to_themselves() {
		assert_eq!(continent_label("Diamond Princess").as_str(), "Diamond Princess");
		assert_eq!(continent_label("Taiwan*").as_str(), "Taiwan*");
		assert_eq!(continent_label("").as_str(), "");
		assert_eq!(continent_label("asdf qwerty").as_str(), "asdf qwerty");
		assert_eq!(continent_label("France").as_str(), "EU");
		assert_eq!(
			classify_continent("MS Zaandam"),
			Err(Unclassified("MS Zaandam".into())),
		);
	}
}

use std::fs;
use std::io;
use std::io::Read;
use std::path::Path;

use log::debug;


/// Opens a source table, decompressing on the fly when the file name ends
/// in `.gz`.
pub fn open_table<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
	let path = path.as_ref();
	let file = fs::File::open(path)?;
	match path.extension() {
		Some(x) if x == "gz" => {
			debug!("reading {} through gzip", path.display());
			Ok(Box::new(flate2::read::GzDecoder::new(io::BufReader::new(file))))
		},
		_ => Ok(Box::new(io::BufReader::new(file))),
	}
}

use std::io;

use log::info;

use covid_dash::{AnalysisTable, Metric, Projector, Settings};


const USAGE: &str = "usage: covid_views <map|bar|countries|total|list> [metric|country] [--per-capita]";


fn write_map<W: io::Write>(w: &mut csv::Writer<W>, p: &Projector, metric: Metric, per_capita: bool) -> Result<(), csv::Error> {
	w.write_record(&["date", "lat", "lon", "size", "text"])?;
	for frame in p.map(metric, per_capita).iter() {
		for marker in frame.markers.iter() {
			w.serialize((frame.date, marker.lat, marker.lon, marker.size, marker.text))?;
		}
	}
	Ok(())
}

fn write_bars<W: io::Write>(w: &mut csv::Writer<W>, p: &Projector, metric: Metric, per_capita: bool) -> Result<(), csv::Error> {
	let chart = p.ranked_bars(metric, per_capita);
	w.write_record(&["country", chart.x_label.as_str(), "count", "hover"])?;
	for bar in chart.bars.iter() {
		w.serialize((bar.country, bar.value, bar.count, &bar.hover))?;
	}
	Ok(())
}

fn write_country_timeline<W: io::Write>(w: &mut csv::Writer<W>, p: &Projector, metric: Metric, per_capita: bool) -> Result<(), csv::Error> {
	w.write_record(&["date", "country", metric.series_name(per_capita)])?;
	for point in p.country_timeline(metric, per_capita).points.iter() {
		w.serialize((point.date, point.country, point.value))?;
	}
	Ok(())
}

fn write_total_timeline<W: io::Write>(w: &mut csv::Writer<W>, p: &Projector, country: Option<&str>, per_capita: bool) -> Result<(), csv::Error> {
	let timeline = p.total_timeline(country, per_capita);
	info!("timeline for {}", timeline.title);
	w.write_record(&["date", "variable", "value"])?;
	for point in timeline.points.iter() {
		w.serialize((point.date, point.series, point.value))?;
	}
	Ok(())
}

fn write_countries<W: io::Write>(w: &mut csv::Writer<W>, table: &AnalysisTable) -> Result<(), csv::Error> {
	w.write_record(&["country"])?;
	for country in table.countries() {
		w.write_record(&[country])?;
	}
	Ok(())
}


fn main() -> Result<(), Box<dyn std::error::Error>> {
	pretty_env_logger::init();

	let argv: Vec<String> = std::env::args().collect();
	let per_capita = argv.iter().any(|a| a == "--per-capita");
	let args: Vec<&str> = argv[1..].iter().map(|a| a.as_str()).filter(|a| *a != "--per-capita").collect();
	let view = match args.first() {
		Some(v) => *v,
		None => {
			eprintln!("{}", USAGE);
			std::process::exit(2);
		},
	};
	let arg = args.get(1).copied();
	// the total view takes a country instead of a metric
	let metric: Metric = match (view, arg) {
		("total", _) | (_, None) => Metric::Confirmed,
		(_, Some(name)) => name.parse()?,
	};

	let settings = Settings::from_env()?;
	info!("loading {} and {}", settings.observations.display(), settings.population.display());
	let table = settings.load()?;
	info!("loaded {} rows up to {:?}", table.len(), table.latest_date());
	let projector = settings.projector(&table);

	let mut w = csv::Writer::from_writer(io::stdout());
	match view {
		"map" => write_map(&mut w, &projector, metric, per_capita)?,
		"bar" => write_bars(&mut w, &projector, metric, per_capita)?,
		"countries" => write_country_timeline(&mut w, &projector, metric, per_capita)?,
		"total" => write_total_timeline(&mut w, &projector, arg, per_capita)?,
		"list" => write_countries(&mut w, &table)?,
		other => {
			eprintln!("unknown view {:?}\n{}", other, USAGE);
			std::process::exit(2);
		},
	}
	w.flush()?;
	Ok(())
}

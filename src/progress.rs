use std::io;
use std::io::Write;
use std::time;

use log::debug;


pub trait ProgressSink {
	fn update(&mut self, inow: usize);
	fn finish(&mut self, n: usize);
}


/// Carriage-return progress line on stderr, for interactive runs.
pub struct ProgressMeter {
	t0: time::Instant,
	tprev: time::Instant,
	iprev: usize,
}

impl ProgressMeter {
	pub fn start() -> Self {
		let now = time::Instant::now();
		eprint!("{:12} [{:10.2}/s]\r", 0, 0.0);
		let _ = io::stderr().flush();
		Self{
			t0: now,
			tprev: now,
			iprev: 0,
		}
	}
}

fn rate(n: usize, dt: time::Duration) -> f64 {
	let secs = dt.as_secs_f64();
	if secs > 0.0 {
		n as f64 / secs
	} else {
		0.0
	}
}

impl ProgressSink for ProgressMeter {
	fn update(&mut self, inow: usize) {
		let now = time::Instant::now();
		let r = rate(inow.saturating_sub(self.iprev), now - self.tprev);
		eprint!("{:12} [{:10.2}/s]\r", inow, r);
		let _ = io::stderr().flush();
		self.iprev = inow;
		self.tprev = now;
	}

	fn finish(&mut self, n: usize) {
		let r = rate(n, self.t0.elapsed());
		eprintln!("{:12} [{:10.2}/s]", n, r);
	}
}


/// Reports progress as debug log lines when nobody is watching a terminal.
pub struct LogProgress {
	what: &'static str,
	t0: time::Instant,
}

impl LogProgress {
	pub fn new(what: &'static str) -> Self {
		Self{
			what,
			t0: time::Instant::now(),
		}
	}
}

impl ProgressSink for LogProgress {
	fn update(&mut self, inow: usize) {
		debug!("{}: {} rows", self.what, inow);
	}

	fn finish(&mut self, n: usize) {
		debug!("{}: {} rows in {:.2}s", self.what, n, self.t0.elapsed().as_secs_f64());
	}
}


pub struct NullProgress;

impl ProgressSink for NullProgress {
	fn update(&mut self, _inow: usize) {}

	fn finish(&mut self, _n: usize) {}
}


pub fn default_output(what: &'static str) -> Box<dyn ProgressSink> {
	if isatty::stderr_isatty() {
		Box::new(ProgressMeter::start())
	} else {
		Box::new(LogProgress::new(what))
	}
}

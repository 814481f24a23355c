use tierscope::boardinfo::BoardDescriptor;
use tierscope::trace::{read_trace, FileHeader, Trace, EMC_UNAVAILABLE};
use tierscope::{Engine, Error, SamplingConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::{Duration, Instant};

const PROC_STAT: &str = "\
cpu  400 0 200 1600 40 0 0 0 0 0
cpu0 100 0 50 400 10 0 0 0 0 0
cpu1 100 0 50 400 10 0 0 0 0 0
cpu2 100 0 50 400 10 0 0 0 0 0
cpu3 100 0 50 400 10 0 0 0 0 0
intr 12345
ctxt 67890
";

const MEMINFO: &str = "\
MemTotal:        8000000 kB
MemFree:         1000000 kB
MemAvailable:    6000000 kB
";

/// Procfs and sysfs stand-ins in a temporary directory.
struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stat"), PROC_STAT).unwrap();
        fs::write(dir.path().join("meminfo"), MEMINFO).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn board(&self, cores: usize) -> BoardDescriptor {
        BoardDescriptor::new("fixture", cores)
            .with_proc_stat(self.path("stat"))
            .with_meminfo(self.path("meminfo"))
    }

    fn output(&self) -> PathBuf {
        self.path("trace.bin")
    }
}

fn record(engine: &Engine, duration: Duration) -> PathBuf {
    engine.start().unwrap();
    engine.wait_for_warmup();
    sleep(duration);
    engine.stop().unwrap().expect("a session was running")
}

fn assert_strictly_increasing(times: impl Iterator<Item = f64>) {
    let times: Vec<f64> = times.collect();
    assert!(
        times.windows(2).all(|w| w[0] < w[1]),
        "timestamps are not strictly increasing"
    );
}

fn assert_file_size(path: &Path, trace: &Trace) {
    let h = &trace.header;
    let expected = FileHeader::SIZE as u64
        + h.num_fast_samples * 98
        + h.num_medium_samples * 104
        + h.num_slow_samples * 72
        + h.num_markers * 16;
    assert_eq!(fs::metadata(path).unwrap().len(), expected);
}

#[test]
fn short_session() {
    let fixture = Fixture::new();
    let engine = Engine::new(fixture.output(), fixture.board(4), SamplingConfig::default()).unwrap();

    let path = record(&engine, Duration::from_millis(100));
    assert_eq!(path, fixture.output());

    let trace = read_trace(&path).unwrap();
    let header = &trace.header;

    assert!(trace.fast.len() > 50, "fast: {}", trace.fast.len());
    assert!(trace.medium.len() > 5, "medium: {}", trace.medium.len());
    assert!(!trace.slow.is_empty());

    assert_eq!(header.num_fast_samples, trace.fast.len() as u64);
    assert_eq!(header.num_medium_samples, trace.medium.len() as u64);
    assert_eq!(header.num_slow_samples, trace.slow.len() as u64);
    assert_eq!(header.num_markers, 0);

    assert_eq!(header.board_name, "fixture");
    assert_eq!(header.num_cpu_cores, 4);
    assert_eq!(header.num_power_rails, 0);
    assert_eq!(header.num_thermal_zones, 0);
    assert_eq!(
        (header.fast_hz, header.medium_hz, header.slow_hz),
        (1000, 100, 10)
    );

    assert_file_size(&path, &trace);

    assert_strictly_increasing(trace.fast.iter().map(|s| s.time_s));
    assert_strictly_increasing(trace.medium.iter().map(|s| s.time_s));
    assert_strictly_increasing(trace.slow.iter().map(|s| s.time_s));

    // the fixture counters never advance, so every core reads idle
    for sample in &trace.fast {
        assert!(sample.cpu_util.iter().all(|v| (0.0..=100.0).contains(v)));
        assert_eq!(sample.ram_used_kb, 2_000_000);
        assert_eq!(sample.ram_available_kb, 6_000_000);
        assert_eq!(sample.gpu_load, 0);
    }

    assert!(!engine.is_running());
}

#[test]
fn markers_are_numbered_in_order() {
    let fixture = Fixture::new();
    let engine = Engine::new(fixture.output(), fixture.board(4), SamplingConfig::default()).unwrap();

    engine.start().unwrap();
    engine.wait_for_warmup();

    let mut ids = Vec::new();
    for _ in 0..3 {
        sleep(Duration::from_millis(10));
        ids.push(engine.sync());
    }
    sleep(Duration::from_millis(10));
    assert_eq!(ids, [1, 2, 3]);

    let path = engine.stop().unwrap().unwrap();
    let trace = read_trace(&path).unwrap();

    assert_eq!(trace.header.num_markers, 3);
    let read_ids: Vec<u64> = trace.markers.iter().map(|m| m.id).collect();
    assert_eq!(read_ids, [1, 2, 3]);

    assert!(trace
        .markers
        .windows(2)
        .all(|w| w[0].fast_sample_idx <= w[1].fast_sample_idx));
    assert!(trace
        .markers
        .iter()
        .all(|m| m.fast_sample_idx <= trace.header.num_fast_samples));

    // the first marker was placed after warmup
    let ids = trace.marker_ids();
    assert_eq!(ids.first(), Some(&0));
    assert_eq!(ids.last(), Some(&3));

    assert_file_size(&path, &trace);
}

#[test]
fn invalid_board_is_rejected() {
    let fixture = Fixture::new();

    let result = Engine::new(fixture.output(), fixture.board(0), SamplingConfig::default());
    assert!(matches!(result, Err(Error::InvalidBoard(_))));

    let result = Engine::new(fixture.output(), fixture.board(17), SamplingConfig::default());
    assert!(matches!(result, Err(Error::InvalidBoard(_))));

    let mut board = fixture.board(4);
    for i in 0..9 {
        board = board.with_power_rail(format!("rail{i}"), "in", "curr");
    }
    let result = Engine::new(fixture.output(), board, SamplingConfig::default());
    assert!(matches!(result, Err(Error::InvalidBoard(_))));

    assert!(!fixture.output().exists());
}

#[test]
fn invalid_rate_is_rejected() {
    let fixture = Fixture::new();
    let sampling = SamplingConfig {
        slow_hz: 0,
        ..Default::default()
    };

    let result = Engine::new(fixture.output(), fixture.board(4), sampling);
    assert!(matches!(result, Err(Error::InvalidRate { hz: 0, .. })));
}

#[test]
fn unavailable_emc() {
    let fixture = Fixture::new();
    let board = fixture.board(4).with_emc_util(fixture.path("missing_emc"));
    let engine = Engine::new(fixture.output(), board, SamplingConfig::default()).unwrap();

    let path = record(&engine, Duration::from_millis(30));
    let trace = read_trace(&path).unwrap();

    assert!(!trace.header.emc_available);
    assert!(!trace.fast.is_empty());
    assert!(trace.fast.iter().all(|s| s.emc_util.is_none()));

    // the on-disk encoding of an unavailable reading
    let bytes = fs::read(&path).unwrap();
    let emc = &bytes[FileHeader::SIZE + 94..FileHeader::SIZE + 98];
    assert_eq!(emc, EMC_UNAVAILABLE.to_le_bytes());
}

#[test]
fn available_emc() {
    let fixture = Fixture::new();
    let emc = fixture.file("emc", "42\n");
    let engine = Engine::new(
        fixture.output(),
        fixture.board(4).with_emc_util(emc),
        SamplingConfig::default(),
    )
    .unwrap();

    let trace = read_trace(&record(&engine, Duration::from_millis(30))).unwrap();

    assert!(trace.header.emc_available);
    assert!(trace.fast.iter().all(|s| s.emc_util == Some(42.0)));
}

#[test]
fn rails_and_zones() {
    let fixture = Fixture::new();
    let board = fixture
        .board(2)
        .with_gpu_load(fixture.file("load", "625\n"))
        .with_power_rail(
            "VDD_IN",
            fixture.file("in1_input", "5000\n"),
            fixture.file("curr1_input", "1500\n"),
        )
        .with_power_rail(
            "VDD_CPU_GPU_CV",
            fixture.file("in2_input", "4800\n"),
            fixture.path("missing_curr"),
        )
        .with_thermal_zone("cpu-thermal", fixture.file("temp0", "47250\n"))
        .with_thermal_zone("gpu-thermal", fixture.file("temp1", "garbage\n"));

    let engine = Engine::new(fixture.output(), board, SamplingConfig::default()).unwrap();
    let trace = read_trace(&record(&engine, Duration::from_millis(150))).unwrap();

    assert_eq!(trace.header.power_rail_names, ["VDD_IN", "VDD_CPU_GPU_CV"]);
    assert_eq!(trace.header.thermal_zone_names, ["cpu-thermal", "gpu-thermal"]);

    assert!(trace.fast.iter().all(|s| s.gpu_load == 625));

    for sample in &trace.medium {
        assert_eq!(sample.voltage_mv[0], 5000);
        assert_eq!(sample.current_ma[0], 1500);
        assert_eq!(sample.power_mw[0], 7500.0);

        // an unreadable current zeroes only that reading
        assert_eq!(sample.voltage_mv[1], 4800);
        assert_eq!(sample.current_ma[1], 0);
        assert_eq!(sample.power_mw[1], 0.0);

        assert!(sample.power_mw[2..].iter().all(|p| *p == 0.0));
    }

    assert!(!trace.slow.is_empty());
    for sample in &trace.slow {
        assert_eq!(sample.temp_c[0], 47.25);
        assert_eq!(sample.temp_c[1], 0.0);
    }
}

#[test]
fn start_while_running_fails() {
    let fixture = Fixture::new();
    let engine = Engine::new(fixture.output(), fixture.board(4), SamplingConfig::default()).unwrap();

    engine.start().unwrap();
    assert!(matches!(engine.start(), Err(Error::AlreadyRunning)));

    // the running session is unaffected
    assert!(engine.is_running());
    engine.wait_for_warmup();
    let before = engine.sample_count();
    sleep(Duration::from_millis(20));
    assert!(engine.sample_count() > before);

    let trace = read_trace(&engine.stop().unwrap().unwrap()).unwrap();
    assert!(trace.fast.len() as u64 >= before);
}

#[test]
fn warmup_is_quick() {
    let fixture = Fixture::new();
    let engine = Engine::new(fixture.output(), fixture.board(4), SamplingConfig::default()).unwrap();

    let start = Instant::now();
    engine.start().unwrap();
    engine.wait_for_warmup();
    let elapsed = start.elapsed();

    assert!(elapsed < Duration::from_millis(200), "warmup took {elapsed:?}");
    assert!(engine.sample_count() >= 10);

    engine.stop().unwrap();
}

#[test]
fn slower_tiers_wait_for_warmup() {
    let fixture = Fixture::new();
    let sampling = SamplingConfig {
        fast_hz: 1000,
        medium_hz: 100,
        slow_hz: 10,
        warmup_samples: 50,
    };
    let engine = Engine::new(fixture.output(), fixture.board(4), sampling).unwrap();

    let trace = read_trace(&record(&engine, Duration::from_millis(150))).unwrap();

    assert!(trace.fast.len() > 50, "fast: {}", trace.fast.len());
    assert!(!trace.medium.is_empty());
    assert!(!trace.slow.is_empty());

    // the last warmup sample precedes anything the slower tiers record
    let warmed_up_at = trace.fast[49].time_s;
    assert!(
        trace.medium[0].time_s >= warmed_up_at,
        "medium sampled at {} before warmup ended at {warmed_up_at}",
        trace.medium[0].time_s
    );
    assert!(
        trace.slow[0].time_s >= warmed_up_at,
        "slow sampled at {} before warmup ended at {warmed_up_at}",
        trace.slow[0].time_s
    );
}

#[test]
fn warmup_timeout() {
    let fixture = Fixture::new();
    let engine = Engine::new(fixture.output(), fixture.board(4), SamplingConfig::default()).unwrap();

    // nothing is running, so there is nothing to wait for
    assert!(!engine.wait_for_warmup_timeout(Duration::from_millis(10)));

    engine.start().unwrap();
    assert!(engine.wait_for_warmup_timeout(Duration::from_secs(1)));
    engine.stop().unwrap();
}

#[test]
fn stop_is_idempotent() {
    let fixture = Fixture::new();
    let engine = Engine::new(fixture.output(), fixture.board(4), SamplingConfig::default()).unwrap();

    assert!(engine.stop().unwrap().is_none());
    assert!(!fixture.output().exists());

    record(&engine, Duration::from_millis(20));
    assert!(engine.stop().unwrap().is_none());
}

#[test]
fn sessions_start_fresh() {
    let fixture = Fixture::new();
    let engine = Engine::new(fixture.output(), fixture.board(4), SamplingConfig::default()).unwrap();

    engine.start().unwrap();
    engine.wait_for_warmup();
    engine.sync();
    engine.sync();
    engine.stop().unwrap();

    engine.start().unwrap();
    engine.wait_for_warmup();
    assert_eq!(engine.sync(), 1);
    let trace = read_trace(&engine.stop().unwrap().unwrap()).unwrap();

    assert_eq!(trace.header.num_markers, 1);
    assert!(trace.fast[0].time_s < 0.1);
}

#[test]
fn scoped_session() {
    let fixture = Fixture::new();
    let engine = Engine::new(fixture.output(), fixture.board(4), SamplingConfig::default()).unwrap();

    {
        let session = engine.session().unwrap();
        assert!(session.is_running());
        assert!(session.sample_count() >= 10);
        assert_eq!(session.sync(), 1);
    }

    // dropping the guard stopped the engine and wrote the trace
    assert!(!engine.is_running());
    let trace = read_trace(&fixture.output()).unwrap();
    assert_eq!(trace.header.num_markers, 1);

    let session = engine.session().unwrap();
    sleep(Duration::from_millis(10));
    let path = session.finish().unwrap();
    assert_eq!(path, Some(fixture.output()));
}

#[test]
fn scoped_session_suppresses_stop_errors() {
    let fixture = Fixture::new();
    let output = fixture.path("missing_dir").join("trace.bin");
    let engine = Engine::new(output, fixture.board(4), SamplingConfig::default()).unwrap();

    {
        let _session = engine.session().unwrap();
    }

    assert!(!engine.is_running());
}

#[test]
fn unwritable_output() {
    let fixture = Fixture::new();
    let output = fixture.path("missing_dir").join("trace.bin");
    let engine = Engine::new(&output, fixture.board(4), SamplingConfig::default()).unwrap();

    engine.start().unwrap();
    engine.wait_for_warmup();

    match engine.stop() {
        Err(Error::Finalize { path, .. }) => assert_eq!(path, output),
        other => panic!("expected a finalize error, got {other:?}"),
    }

    assert!(!engine.is_running());
}

#[test]
fn dropping_a_running_engine_writes_the_trace() {
    let fixture = Fixture::new();

    {
        let engine =
            Engine::new(fixture.output(), fixture.board(4), SamplingConfig::default()).unwrap();
        engine.start().unwrap();
        engine.wait_for_warmup();
    }

    let trace = read_trace(&fixture.output()).unwrap();
    assert!(trace.header.num_fast_samples >= 10);
}

#[test]
fn custom_rates() {
    let fixture = Fixture::new();
    let sampling = SamplingConfig {
        fast_hz: 500,
        medium_hz: 50,
        slow_hz: 20,
        warmup_samples: 5,
    };
    let engine = Engine::new(fixture.output(), fixture.board(4), sampling).unwrap();

    let trace = read_trace(&record(&engine, Duration::from_millis(200))).unwrap();

    assert_eq!(
        (trace.header.fast_hz, trace.header.medium_hz, trace.header.slow_hz),
        (500, 50, 20)
    );
    // roughly 100 fast samples plus warmup
    assert!(trace.fast.len() > 50, "fast: {}", trace.fast.len());
    assert!(trace.fast.len() < 200, "fast: {}", trace.fast.len());

    let summary = trace.summary();
    assert_eq!(summary.fast.samples, trace.fast.len() as u64);
    assert!(summary.fast.observed_hz.is_some());
}

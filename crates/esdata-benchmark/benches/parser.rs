use std::hint::black_box;
use std::sync::Arc;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use esdata_errors::StringSink;
use esdata_parse::DataFile;

const SHIP: &str = r#"ship "Kestrel"
	sprite "ship/kestrel"
	attributes
		category "Heavy Warship"
		"cost" 7000000
		"shields" 16300
		"hull" 6800
		"mass" 650
		weapon
			"blast radius" 240
			"hit force" 3600
	outfits
		"Heavy Laser" 4
		"Quad Blaster Turret" 2
	engine -27 228
	engine 27 228
	# hardpoints
	gun -16 -122 "Heavy Laser"
	gun 16 -122 "Heavy Laser"
	turret 0 -40 "Quad Blaster Turret"
	description `A "heavily armed" warship.`
"#;

fn benchmark_parser(c: &mut Criterion) {
    let inputs = [("Single", SHIP.to_owned()), ("Fleet", SHIP.repeat(200))];

    let mut group = c.benchmark_group("Parser Benchmark");

    for (name, text) in inputs {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_data", name), &text, |b, text| {
            b.iter(|| {
                let file = DataFile::from_text(text, Arc::new(StringSink::new()));
                black_box(file);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);

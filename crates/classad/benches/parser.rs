//! Parser benchmarks using divan
//!
//! Benchmarks for reading the canonical text syntax, from single literals
//! up to whole ads.

use classad::{parse_expression, parse_record};

fn main() {
    divan::main();
}

const JOB_AD: &str = r#"[
    MyType = "Job";
    TargetType = "Machine";
    Owner = "ann";
    Cmd = "/usr/bin/sim";
    Args = {"-n", 16, "--seed", 42};
    ImageSize = 512;
    QDate = absTime("2024-03-01T12:00:00+01:00");
    MaxRuntime = relTime("2+00:00:00");
    Requirements = other.Arch == "X86_64" && other.OpSys == "LINUX" && other.Memory >= ImageSize;
    Rank = other.Memory / 1024 + (other.HasGPU is true ? 100 : 0)
]"#;

// === Literal Benchmarks ===

mod literals {
    use super::*;

    #[divan::bench]
    fn integer_literal(bencher: divan::Bencher) {
        bencher.bench_local(|| parse_expression(divan::black_box("42")));
    }

    #[divan::bench]
    fn real_literal(bencher: divan::Bencher) {
        bencher.bench_local(|| parse_expression(divan::black_box("3.141590000000000E+00")));
    }

    #[divan::bench]
    fn string_literal(bencher: divan::Bencher) {
        bencher.bench_local(|| parse_expression(divan::black_box(r#""Hello,\tWorld!""#)));
    }

    #[divan::bench]
    fn abs_time_literal(bencher: divan::Bencher) {
        bencher.bench_local(|| {
            parse_expression(divan::black_box(r#"absTime("2024-03-15T10:30:00.123Z")"#))
        });
    }
}

// === Operator Benchmarks ===

mod operators {
    use super::*;

    #[divan::bench]
    fn precedence_mix(bencher: divan::Bencher) {
        bencher.bench_local(|| {
            parse_expression(divan::black_box("a || b && c | d ^ e & f == g < h << i + j * k"))
        });
    }

    #[divan::bench]
    fn selection_chain(bencher: divan::Bencher) {
        bencher.bench_local(|| parse_expression(divan::black_box("a.b.c[0].d.parent.e")));
    }
}

// === Record Benchmarks ===

mod records {
    use super::*;

    #[divan::bench]
    fn job_ad(bencher: divan::Bencher) {
        bencher.bench_local(|| parse_record(divan::black_box(JOB_AD)));
    }

    #[divan::bench(args = [10, 100, 1000])]
    fn wide_record(bencher: divan::Bencher, n: usize) {
        let text = format!(
            "[{}]",
            (0..n).map(|i| format!("a{i} = {i}")).collect::<Vec<_>>().join("; ")
        );
        bencher.bench_local(|| parse_record(divan::black_box(&text)));
    }
}

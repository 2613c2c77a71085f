//! Writes `sample_plots.csv`, a small demo catalog in the loader's input
//! schema.

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let headers = [
        "NO",
        "NET PLOT AREA IN SQ.FEET",
        "BUILT UP AREA IN SQ.FEET",
        "TOTAL PLOT AREA IN SQ. FEET",
        "TOTAL PLOT AREA IN SQ. MTR",
        "TOTAL PLOT AREA IN SQ. YDS",
        "RATE (1500)*(900)",
        "9 % Pricing Discount Rates ( 1350 * 810 )",
        "Status",
    ];

    let output_path = "sample_plots.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer.write_record(headers).expect("Failed to write header");

    let n_plots = 60u32;
    for no in 1..=n_plots {
        let net = (600.0 + rng.next_f64() * 2_400.0).round();
        let built = (net * (0.35 + rng.next_f64() * 0.25)).round();
        let total = net + built;
        let rate = total * 1_500.0;
        let discounted = (rate * 0.91).round();

        let roll = rng.next_f64();
        let status = if roll < 0.15 {
            "Sold Out"
        } else if roll < 0.30 {
            "Reserved"
        } else {
            "Available"
        };

        writer
            .write_record([
                no.to_string(),
                format!("{net:.0}"),
                format!("{built:.0}"),
                format!("{total:.0}"),
                format!("{:.2}", total / 10.7639),
                format!("{:.2}", total / 9.0),
                format!("{rate:.0}"),
                format!("{discounted:.0}"),
                status.to_string(),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush CSV");
    println!("Wrote {n_plots} plots to {output_path}");
}

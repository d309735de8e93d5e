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

    /// Bernoulli draw with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Per-generation adoption probabilities, older technologies more common.
const TECH_PROBABILITY: [(&str, f64); 6] = [
    ("COBERTURA_2G", 0.95),
    ("COBERTURA_3G", 0.85),
    ("COBERTURA_HSPA+", 0.60),
    ("COBERTURA_4G", 0.70),
    ("COBERTURA_LTE", 0.65),
    ("COBERTURA_5G", 0.15),
];

fn main() {
    let mut rng = SimpleRng::new(42);

    let providers = ["CLARO", "MOVISTAR", "TIGO"];
    let departments: [(&str, &str, &[(&str, &str)]); 2] = [
        (
            "05",
            "ANTIOQUIA",
            &[
                ("05001", "Medellín"),
                ("05266", "Envigado"),
                ("05088", "Bello"),
                ("05360", "Itagüí"),
                ("05615", "Rionegro"),
            ],
        ),
        (
            "17",
            "CALDAS",
            &[
                ("17001", "Manizales"),
                ("17174", "Chinchiná"),
                ("17873", "Villamaría"),
            ],
        ),
    ];
    let periods = [(2022, 4), (2023, 1), (2023, 2), (2023, 3)];

    let output_path = "sample_coverage.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record(cobermap_columns())
        .expect("Failed to write header");

    let mut n_rows = 0usize;
    for &(year, quarter) in &periods {
        for &(dep_code, dep_name, municipalities) in &departments {
            for &(mun_code, mun_name) in municipalities {
                // A few populated centres per municipality.
                for centre in 1..=4u32 {
                    for provider in &providers {
                        let centre_code = format!("{mun_code}{centre:03}");
                        let centre_name = format!("{mun_name} CP {centre}");

                        let mut record = vec![
                            year.to_string(),
                            quarter.to_string(),
                            provider.to_string(),
                            dep_code.to_string(),
                            dep_name.to_string(),
                            mun_code.to_string(),
                            mun_name.to_string(),
                            mun_name.to_string(),
                            centre_code,
                            centre_name,
                        ];
                        for &(_, p) in &TECH_PROBABILITY {
                            record.push(if rng.chance(p) { "S" } else { "N" }.to_string());
                        }

                        writer.write_record(&record).expect("Failed to write row");
                        n_rows += 1;
                    }
                }
            }
        }
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {n_rows} rows to {output_path}");
}

fn cobermap_columns() -> [&'static str; 16] {
    [
        "AÑO",
        "TRIMESTRE",
        "PROVEEDOR",
        "COD_DEPARTAMENTO",
        "DEPARTAMENTO",
        "COD_MUNICIPIO",
        "MUNICIPIO",
        "CABECERA_MUNICIPAL",
        "COD_CENTRO_POBLADO",
        "CENTRO_POBLADO",
        "COBERTURA_2G",
        "COBERTURA_3G",
        "COBERTURA_HSPA+",
        "COBERTURA_4G",
        "COBERTURA_LTE",
        "COBERTURA_5G",
    ]
}

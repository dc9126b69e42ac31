use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use clap::Parser;

use salesboard::data::model::RawSalesRecord;

/// Write a deterministic synthetic superstore extract.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output path
    #[arg(default_value = "data/superstore.csv")]
    output: PathBuf,

    /// Number of orders to generate (each has 1-4 line items)
    #[arg(long, default_value_t = 2000)]
    orders: usize,

    /// Encode the file as ISO-8859-1 instead of UTF-8
    #[arg(long)]
    latin1: bool,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

const SHIP_MODES: [(&str, i64); 4] = [
    ("Standard Class", 5),
    ("Second Class", 3),
    ("First Class", 2),
    ("Same Day", 0),
];

const SEGMENTS: [&str; 3] = ["Consumer", "Corporate", "Home Office"];

const PLACES: [(&str, &str, &str); 10] = [
    ("West", "California", "Los Angeles"),
    ("West", "California", "San Francisco"),
    ("West", "Washington", "Seattle"),
    ("East", "New York", "New York City"),
    ("East", "Pennsylvania", "Philadelphia"),
    ("Central", "Texas", "Houston"),
    ("Central", "Illinois", "Chicago"),
    ("South", "Kentucky", "Henderson"),
    ("South", "Florida", "Miami"),
    ("East", "Ohio", "Columbus"),
];

const CUSTOMERS: [&str; 8] = [
    "Claire Gute",
    "Sean Miller",
    "Tamara Chand",
    "Raymond Buch",
    "José Álvarez",
    "Zoë Brontë",
    "Adrian Barton",
    "Sanjit Chand",
];

/// (category, sub-category, product, base price, typical margin)
const PRODUCTS: [(&str, &str, &str, f64, f64); 12] = [
    ("Furniture", "Bookcases", "Bush Somerset Collection Bookcase", 261.96, 0.16),
    ("Furniture", "Chairs", "Hon Deluxe Fabric Upholstered Stacking Chairs", 731.94, 0.13),
    ("Furniture", "Tables", "Bretford CR4500 Series Slim Rectangular Table", 957.58, -0.40),
    ("Furniture", "Furnishings", "Eldon Expressions Wood Desk Accessories", 48.86, 0.29),
    ("Office Supplies", "Binders", "GBC Standard Plastic Binding Systems Combs", 22.37, 0.33),
    ("Office Supplies", "Paper", "Xerox 1967", 15.55, 0.48),
    ("Office Supplies", "Storage", "Fellowes Super Stor/Drawer", 55.50, 0.02),
    ("Office Supplies", "Art", "Newell 322", 7.28, 0.27),
    ("Technology", "Phones", "Mitel 5320 IP Phone VoIP phone", 907.15, 0.10),
    ("Technology", "Copiers", "Canon imageCLASS 2200 Advanced Copier", 3359.95, 0.40),
    ("Technology", "Machines", "Cubify CubeX 3D Printer Double Head Print", 4499.98, -0.76),
    ("Technology", "Accessories", "Logitech Wireless Gaming Headset G930", 159.98, 0.25),
];

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let start = NaiveDate::from_ymd_opt(2021, 1, 1).expect("valid start date");
    let span_days = 365 * 3;

    let mut rows: Vec<RawSalesRecord> = Vec::new();
    for order_no in 0..args.orders {
        let order_date = start + Duration::days(rng.below(span_days) as i64);
        let (ship_mode, lead) = *rng.pick(&SHIP_MODES);
        let ship_date = order_date + Duration::days(lead + rng.below(2) as i64);
        let customer_idx = rng.below(CUSTOMERS.len());
        let (region, state, city) = *rng.pick(&PLACES);
        let segment = SEGMENTS[customer_idx % SEGMENTS.len()];
        let order_id = format!("CA-{}-{:06}", order_date.format("%Y"), 100_000 + order_no);

        for _ in 0..(1 + rng.below(4)) {
            let product_idx = rng.below(PRODUCTS.len());
            let (category, sub_category, product, price, margin) = PRODUCTS[product_idx];
            let quantity = 1 + rng.below(6) as i64;
            let discount = [0.0, 0.0, 0.1, 0.2, 0.5][rng.below(5)];
            let sales = round2(price * quantity as f64 * (1.0 - discount));
            let noise = (rng.next_f64() - 0.5) * 0.2;
            let profit = round2(sales * (margin - discount + noise));

            rows.push(RawSalesRecord {
                order_id: order_id.clone(),
                order_date: order_date.format("%m/%d/%Y").to_string(),
                ship_date: ship_date.format("%m/%d/%Y").to_string(),
                ship_mode: ship_mode.to_string(),
                customer_id: format!("CU-{:05}", 10_000 + customer_idx),
                customer_name: CUSTOMERS[customer_idx].to_string(),
                segment: segment.to_string(),
                country: "United States".to_string(),
                city: city.to_string(),
                state: state.to_string(),
                region: region.to_string(),
                product_id: format!(
                    "{}-{:08}",
                    &category[..3].to_uppercase(),
                    10_000_000 + product_idx
                ),
                category: category.to_string(),
                sub_category: sub_category.to_string(),
                product_name: product.to_string(),
                sales: Some(sales),
                quantity: Some(quantity),
                discount: Some(discount),
                profit: Some(profit),
            });
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in &rows {
        writer.serialize(row).expect("Failed to serialize row");
    }
    let utf8 = writer.into_inner().expect("Failed to flush CSV");

    let bytes = if args.latin1 {
        String::from_utf8(utf8)
            .expect("CSV output is UTF-8")
            .chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
            .collect()
    } else {
        utf8
    };

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).expect("Failed to create output directory");
    }
    std::fs::write(&args.output, bytes).expect("Failed to write output file");

    println!(
        "Wrote {} line items ({} orders, {}) to {}",
        rows.len(),
        args.orders,
        if args.latin1 { "latin-1" } else { "utf-8" },
        args.output.display()
    );
}

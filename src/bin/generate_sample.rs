use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const OPENERS: &[&str] = &[
    "Big news!",
    "We just shipped our new analytics pipeline.",
    "Three lessons from a year of remote work.",
    "Hiring!",
    "Product launch day is finally here.",
    "What does a great code review look like?",
    "Thank you to everyone who joined the webinar.",
];

const FOLLOW_UPS: &[&str] = &[
    "Here is what we learned along the way.",
    "Read the full write-up on our blog.",
    "Comment below with your experience.",
    "Link in the first comment.",
    "We would love your feedback.",
];

const POST_TYPES: &[&str] = &["Organic", "Organic", "Organic", "Sponsored"];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_posts.csv".to_string());

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "Post title",
        "Created date",
        "Engagement rate",
        "Click through rate (CTR)",
        "Impressions",
        "Post type",
    ])?;

    let first_day = NaiveDate::from_ymd_opt(2024, 1, 1).context("valid start date")?;
    let n_posts = 60;

    for i in 0..n_posts {
        let title = format!("{} {}", rng.pick(OPENERS), rng.pick(FOLLOW_UPS));
        let created = first_day
            .and_hms_opt(8 + (i % 10) as u32, 0, 0)
            .context("valid time")?
            + Duration::days(i64::from(i) * 3 / 2);
        let post_type = rng.pick(POST_TYPES);

        // Sponsored posts reach further but engage a little less.
        let reach = if post_type == "Sponsored" { 8.0 } else { 1.0 };
        let impressions = (500.0 + rng.next_f64() * 4500.0) * reach;
        let engagement = 0.01 + rng.next_f64() * 0.09 / reach.sqrt();
        let ctr = engagement * (0.1 + rng.next_f64() * 0.3);

        // Leave a few gaps so the dashboard's missing-value handling shows.
        let impressions = if i % 17 == 5 {
            String::new()
        } else {
            format!("{}", impressions.round() as u64)
        };

        writer.write_record([
            title,
            created.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{engagement:.4}"),
            format!("{ctr:.4}"),
            impressions,
            post_type.to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {n_posts} posts to {output_path}");
    Ok(())
}

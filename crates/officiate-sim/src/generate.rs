//! Seeded synthetic problem generator.
//!
//! Shapes follow a small tournament: matches start on even hours between
//! 0 and 10 and last one or two hours, each needs one of four
//! certifications, and referees work 6–8 hours a day holding one or two
//! certifications. The same seed always yields the same problem.

use anyhow::{Result, bail};
use officiate_core::{Certification, CertificationSet, Day, Match, Problem, Referee};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters of one generated problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub matches: usize,
    pub referees: usize,
    pub days: Day,
    /// Size of the certification domain; tags are `0..certifications`.
    pub certifications: u8,
    /// Number of possible start slots per day.
    pub start_slots: u32,
    /// Hours between consecutive start slots.
    pub slot_hours: u32,
    pub min_duration: u32,
    pub max_duration: u32,
    pub min_daily_hours: u32,
    pub max_daily_hours: u32,
    /// Chance (percent, 0–100) that a referee draws a second certification.
    pub second_certification_percent: u8,
}

impl GeneratorConfig {
    /// Defaults for everything except the pool sizes.
    #[must_use]
    pub const fn new(matches: usize, referees: usize, days: Day) -> Self {
        Self {
            matches,
            referees,
            days,
            certifications: 4,
            start_slots: 6,
            slot_hours: 2,
            min_duration: 1,
            max_duration: 2,
            min_daily_hours: 6,
            max_daily_hours: 8,
            second_certification_percent: 50,
        }
    }

    /// Validate configuration before generating.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.days == 0 {
            bail!("days must be > 0");
        }
        if self.certifications == 0 || self.certifications > Certification::MAX {
            bail!(
                "certifications must be in 1..={}, got {}",
                Certification::MAX,
                self.certifications
            );
        }
        if self.start_slots == 0 {
            bail!("start_slots must be > 0");
        }
        if self.min_duration == 0 || self.min_duration > self.max_duration {
            bail!(
                "duration range {}..={} must be non-empty and start above 0",
                self.min_duration,
                self.max_duration
            );
        }
        if self.min_daily_hours > self.max_daily_hours {
            bail!(
                "daily hours range {}..={} is empty",
                self.min_daily_hours,
                self.max_daily_hours
            );
        }
        if self.second_certification_percent > 100 {
            bail!("second_certification_percent must be <= 100");
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(20, 6, 2)
    }
}

/// Generate `config.matches` matches with ids `0..matches`.
///
/// # Errors
///
/// Returns an error if the config is invalid or a slot overflows `u32`.
pub fn generate_matches(config: &GeneratorConfig, rng: &mut impl Rng) -> Result<Vec<Match>> {
    config.validate()?;
    (0..config.matches)
        .map(|id| -> Result<Match> {
            let day = rng.gen_range(0..config.days);
            let Some(start) = rng
                .gen_range(0..config.start_slots)
                .checked_mul(config.slot_hours)
            else {
                bail!("start slot overflows for match {id}");
            };
            let duration = rng.gen_range(config.min_duration..=config.max_duration);
            let Some(end) = start.checked_add(duration) else {
                bail!("end time overflows for match {id}");
            };
            let cert = random_certification(config, rng)?;
            Ok(Match::new(id, day, start, end, cert)?)
        })
        .collect()
}

/// Generate `config.referees` referees with ids `0..referees`.
///
/// # Errors
///
/// Returns an error if the config is invalid.
pub fn generate_referees(config: &GeneratorConfig, rng: &mut impl Rng) -> Result<Vec<Referee>> {
    config.validate()?;
    (0..config.referees)
        .map(|id| -> Result<Referee> {
            let hours = rng.gen_range(config.min_daily_hours..=config.max_daily_hours);
            let mut certifications = CertificationSet::empty();
            certifications.insert(random_certification(config, rng)?);
            if rng.gen_range(0..100) < config.second_certification_percent {
                certifications.insert(random_certification(config, rng)?);
            }
            Ok(Referee {
                id,
                certifications,
                max_hours_per_day: hours,
                availability: Vec::new(),
            })
        })
        .collect()
}

/// Generate a whole problem from `seed`.
///
/// # Errors
///
/// Returns an error if the config is invalid.
pub fn generate_problem(config: &GeneratorConfig, seed: u64) -> Result<Problem> {
    let mut rng = StdRng::seed_from_u64(seed);
    let matches = generate_matches(config, &mut rng)?;
    let referees = generate_referees(config, &mut rng)?;
    debug!(
        seed,
        matches = matches.len(),
        referees = referees.len(),
        days = config.days,
        "generated problem"
    );
    Ok(Problem::new(config.days, referees, matches))
}

fn random_certification(config: &GeneratorConfig, rng: &mut impl Rng) -> Result<Certification> {
    Ok(Certification::new(rng.gen_range(0..config.certifications))?)
}

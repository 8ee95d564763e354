//! Hour-of-day classification into fixed risk bands
//!
//! The band boundaries and base risks are policy constants taken from the
//! production rule set, not computed values.

/// One of six fixed time-of-day bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourBand {
    VeryLateNight,
    EarlyMorning,
    MorningStart,
    BusinessHours,
    Evening,
    Night,
}

impl HourBand {
    /// Classify an hour-of-day in `0..=23`.
    pub fn classify(hour: u32) -> Self {
        match hour {
            0..=4 => HourBand::VeryLateNight,
            5..=6 => HourBand::EarlyMorning,
            7..=8 => HourBand::MorningStart,
            9..=16 => HourBand::BusinessHours,
            17..=20 => HourBand::Evening,
            _ => HourBand::Night,
        }
    }

    /// Base risk weight for the band.
    pub fn base_risk(self) -> f64 {
        match self {
            HourBand::VeryLateNight => 0.8,
            HourBand::EarlyMorning => 0.6,
            HourBand::MorningStart => 0.2,
            HourBand::BusinessHours => 0.1,
            HourBand::Evening => 0.25,
            HourBand::Night => 0.6,
        }
    }

    /// Human label used verbatim in evaluator reasons.
    pub fn label(self) -> &'static str {
        match self {
            HourBand::VeryLateNight => "very late night (00:00-04:59)",
            HourBand::EarlyMorning => "early morning (05:00-06:59)",
            HourBand::MorningStart => "morning hours (07:00-08:59)",
            HourBand::BusinessHours => "business hours (09:00-16:59)",
            HourBand::Evening => "evening hours (17:00-20:59)",
            HourBand::Night => "night hours (21:00-23:59)",
        }
    }
}

use super::{aggregate, resolve_common_parameters, ParameterSummary};
use crate::host::{ElementRef, HostSelection};
use crate::settings::Settings;
use tracing::{debug, warn};

/// Ratios offered to the user, smallest first.
pub const RATIO_CHOICES: [f64; 9] = [
    0.0001, 0.001, 0.01, 0.1, 1.0, 10.0, 100.0, 1000.0, 10000.0,
];
const DEFAULT_RATIO_INDEX: usize = 4;

pub const MIN_ROUNDING: i32 = 0;
pub const MAX_ROUNDING: i32 = 10;

/// The summary table together with the ratio and rounding it is shown at.
///
/// Ratio changes rescale the existing summaries and rounding changes re-round
/// their stored raw sums; only [`SumSession::refresh`] reads elements.
#[derive(Debug, Clone)]
pub struct SumSession {
    summaries: Vec<ParameterSummary>,
    ratio_index: usize,
    rounding: i32,
}

impl SumSession {
    /// Starts a session from persisted settings, repairing values outside the
    /// allowed choices.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let ratio_index = ratio_index(settings.selected_ratio).unwrap_or_else(|| {
            warn!(
                ratio = settings.selected_ratio,
                "unknown ratio in settings, using 1"
            );
            DEFAULT_RATIO_INDEX
        });

        let rounding = settings.value_rounding.clamp(MIN_ROUNDING, MAX_ROUNDING);
        if rounding != settings.value_rounding {
            warn!(
                rounding = settings.value_rounding,
                clamped = rounding,
                "rounding in settings out of range"
            );
        }

        Self {
            summaries: Vec::new(),
            ratio_index,
            rounding,
        }
    }

    #[must_use]
    pub fn summaries(&self) -> &[ParameterSummary] {
        &self.summaries
    }

    #[must_use]
    pub fn ratio(&self) -> f64 {
        RATIO_CHOICES[self.ratio_index]
    }

    #[must_use]
    pub fn rounding(&self) -> i32 {
        self.rounding
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            selected_ratio: self.ratio(),
            value_rounding: self.rounding,
        }
    }

    /// Discards all summaries and rebuilds them from `elements`.
    pub fn refresh<E: ElementRef>(&mut self, elements: &[&E]) {
        let ratio = self.ratio();
        self.summaries = resolve_common_parameters(elements)
            .into_iter()
            .map(|parameter| aggregate(parameter, elements, ratio, self.rounding))
            .collect();
        debug!(
            elements = elements.len(),
            parameters = self.summaries.len(),
            "refreshed summaries"
        );
    }

    pub fn refresh_from<H: HostSelection>(&mut self, host: &H) {
        let elements = host.selected_elements();
        self.refresh(&elements);
    }

    /// Selects `ratio` if it is one of [`RATIO_CHOICES`].
    pub fn set_ratio(&mut self, ratio: f64) -> bool {
        match ratio_index(ratio) {
            Some(index) => {
                self.select_ratio(index);
                true
            }
            None => false,
        }
    }

    pub fn next_ratio(&mut self) -> bool {
        if self.ratio_index + 1 < RATIO_CHOICES.len() {
            self.select_ratio(self.ratio_index + 1);
            true
        } else {
            false
        }
    }

    pub fn previous_ratio(&mut self) -> bool {
        if self.ratio_index > 0 {
            self.select_ratio(self.ratio_index - 1);
            true
        } else {
            false
        }
    }

    /// Sets the rounding precision; refuses values outside
    /// [`MIN_ROUNDING`]..=[`MAX_ROUNDING`].
    pub fn set_rounding(&mut self, rounding: i32) -> bool {
        if !(MIN_ROUNDING..=MAX_ROUNDING).contains(&rounding) {
            return false;
        }
        if rounding != self.rounding {
            self.rounding = rounding;
            let ratio = self.ratio();
            for summary in &mut self.summaries {
                summary.apply_rounding(rounding, ratio);
            }
        }
        true
    }

    pub fn increment_rounding(&mut self) -> bool {
        self.set_rounding(self.rounding + 1)
    }

    pub fn decrement_rounding(&mut self) -> bool {
        self.set_rounding(self.rounding - 1)
    }

    /// Decimals that show a coefficient without float noise: the rounding
    /// plus the decimals the ratio introduces.
    #[must_use]
    pub fn coefficient_decimals(&self) -> usize {
        let ratio_decimals = DEFAULT_RATIO_INDEX.saturating_sub(self.ratio_index);
        self.rounding.unsigned_abs() as usize + ratio_decimals
    }

    #[must_use]
    pub fn format_sum(&self, summary: &ParameterSummary) -> String {
        format!("{:.*}", self.rounding.unsigned_abs() as usize, summary.display_sum)
    }

    #[must_use]
    pub fn format_coefficient(&self, summary: &ParameterSummary) -> String {
        format!("{:.*}", self.coefficient_decimals(), summary.coefficient)
    }

    fn select_ratio(&mut self, index: usize) {
        self.ratio_index = index;
        let ratio = self.ratio();
        for summary in &mut self.summaries {
            summary.apply_scale(ratio);
        }
    }
}

impl Default for SumSession {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

fn ratio_index(ratio: f64) -> Option<usize> {
    RATIO_CHOICES.iter().position(|&r| r == ratio)
}

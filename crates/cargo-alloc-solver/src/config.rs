// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::model::assembler::AssemblerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Knobs of one allocation run.
///
/// Every field has a default, so a JSON file only needs to name what it
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Routes at or below this tonnage are treated as unallocated.
    pub tonnage_epsilon: f64,
    /// Decimal places kept when a report is rendered for display.
    pub display_precision: u32,
    /// Wall-clock bound on one solver call, in milliseconds.
    pub solver_time_limit_ms: Option<u64>,
    pub assembler: AssemblerConfig,
}

impl Default for PipelineConfig {
    #[inline]
    fn default() -> Self {
        Self {
            tonnage_epsilon: 1e-6,
            display_precision: 2,
            solver_time_limit_ms: None,
            assembler: AssemblerConfig::default(),
        }
    }
}

impl PipelineConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_tonnage_epsilon(mut self, epsilon: f64) -> Self {
        self.tonnage_epsilon = epsilon.max(0.0);
        self
    }

    #[inline]
    pub fn with_display_precision(mut self, precision: u32) -> Self {
        self.display_precision = precision;
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.solver_time_limit_ms = Some(limit.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    #[inline]
    pub fn without_time_limit(mut self) -> Self {
        self.solver_time_limit_ms = None;
        self
    }

    #[inline]
    pub fn with_assembler(mut self, assembler: AssemblerConfig) -> Self {
        self.assembler = assembler;
        self
    }

    #[inline]
    pub fn solver_time_limit(&self) -> Option<Duration> {
        self.solver_time_limit_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = PipelineConfig::default();
        assert_eq!(c.tonnage_epsilon, 1e-6);
        assert_eq!(c.display_precision, 2);
        assert_eq!(c.solver_time_limit(), None);
        assert!(c.assembler.route_leg_caps);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c: PipelineConfig =
            serde_json::from_str(r#"{"solver_time_limit_ms": 1500, "assembler": {"master_caps": false}}"#).unwrap();
        assert_eq!(c.solver_time_limit(), Some(Duration::from_millis(1500)));
        assert_eq!(c.display_precision, 2);
        assert!(!c.assembler.master_caps);
        assert!(c.assembler.route_minimums);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<PipelineConfig>(r#"{"epsilon": 1}"#).is_err());
    }

    #[test]
    fn test_builders() {
        let c = PipelineConfig::new()
            .with_time_limit(Duration::from_secs(3))
            .with_display_precision(4)
            .with_tonnage_epsilon(-1.0);
        assert_eq!(c.solver_time_limit_ms, Some(3000));
        assert_eq!(c.display_precision, 4);
        assert_eq!(c.tonnage_epsilon, 0.0);
        assert_eq!(c.without_time_limit().solver_time_limit(), None);
    }
}

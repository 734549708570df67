//! The table's sim-points tally: a number the user types in and can divide
//! down with the `/2` .. `/6` buttons.

#[cfg(test)]
#[path = "sim_points_test.rs"]
mod sim_points_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimPoints {
    value: i64,
}

impl SimPoints {
    #[must_use]
    pub fn value(self) -> i64 {
        self.value
    }

    pub fn set(&mut self, value: i64) {
        self.value = value;
        tracing::debug!(value, "sim points set");
    }

    /// Divide and round toward negative infinity. `None` for a zero divisor,
    /// leaving the tally unchanged.
    pub fn divide(&mut self, divisor: u32) -> Option<i64> {
        if divisor == 0 {
            tracing::warn!(value = self.value, "sim points divided by zero, ignored");
            return None;
        }
        self.value = self.value.div_euclid(i64::from(divisor));
        tracing::debug!(divisor, value = self.value, "sim points divided");
        Some(self.value)
    }
}

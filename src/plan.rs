use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// How one month of income is spent and invested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthAllocation {
    pub essential: f64,
    pub discretionary: f64,
    pub fixed_income: f64,
    pub variable_income: f64,
    pub treasury: f64,
}

impl MonthAllocation {
    pub fn total_spend(&self) -> f64 {
        self.essential + self.discretionary
    }

    pub fn total_invested(&self) -> f64 {
        self.fixed_income + self.variable_income + self.treasury
    }
}

/// A candidate plan: one allocation per month, in calendar order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    months: Vec<MonthAllocation>,
}

pub type Population = Vec<Plan>;

impl Plan {
    pub fn new(months: Vec<MonthAllocation>) -> Self {
        Plan { months }
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn months(&self) -> &[MonthAllocation] {
        &self.months
    }

    pub fn months_mut(&mut self) -> &mut [MonthAllocation] {
        &mut self.months
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MonthAllocation> {
        self.months.iter()
    }
}

impl Index<usize> for Plan {
    type Output = MonthAllocation;

    fn index(&self, month: usize) -> &Self::Output {
        &self.months[month]
    }
}

impl IndexMut<usize> for Plan {
    fn index_mut(&mut self, month: usize) -> &mut Self::Output {
        &mut self.months[month]
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a MonthAllocation;
    type IntoIter = std::slice::Iter<'a, MonthAllocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.months.iter()
    }
}

//! Fishing firms

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::economy::types::{FirmId, PersonId, Sector};

/// One unit sale recorded during the current cycle
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub price: f64,
    pub quantity: f64,
}

/// A fishing firm
///
/// `employees` is the other half of the employer/employee link and is only
/// written through [`crate::economy::registry`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Firm {
    pub id: FirmId,
    pub funds: f64,
    pub(crate) employees: BTreeSet<PersonId>,
    /// Fish available for sale
    pub stock: f64,
    /// Unit offer price
    pub price_level: f64,
    /// Fish one employee catches per day
    pub sales_efficiency: f64,
    pub sector: Sector,
    /// Revenue accumulated during the current cycle
    revenue: f64,
    sales: Vec<SaleRecord>,
    revenue_history: Vec<f64>,
}

impl Firm {
    pub fn new(id: FirmId, funds: f64, stock: f64, price_level: f64, sales_efficiency: f64) -> Self {
        Firm {
            id,
            funds,
            employees: BTreeSet::new(),
            stock,
            price_level,
            sales_efficiency,
            sector: Sector::Fishing,
            revenue: 0.0,
            sales: Vec::new(),
            revenue_history: Vec::new(),
        }
    }

    pub fn employees(&self) -> &BTreeSet<PersonId> {
        &self.employees
    }

    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    /// Daily catch of the current workforce
    pub fn production_capacity(&self) -> f64 {
        self.sales_efficiency * self.employees.len() as f64
    }

    /// Add today's catch to the unsold carry-over
    pub fn restock(&mut self) {
        self.stock = (self.stock + self.production_capacity()).max(0.0);
    }

    /// Record a sale at the given unit price and take it out of stock
    pub fn add_sale(&mut self, price: f64, quantity: f64) {
        self.revenue += price * quantity;
        self.stock = (self.stock - quantity).max(0.0);
        self.sales.push(SaleRecord { price, quantity });
    }

    /// Revenue accumulated this cycle
    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    /// Sales recorded this cycle
    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    /// Most recent recorded daily revenue (0 before the first close)
    pub fn last_revenue(&self) -> f64 {
        self.revenue_history.last().copied().unwrap_or(0.0)
    }

    pub fn revenue_history(&self) -> &[f64] {
        &self.revenue_history
    }

    /// Close the day: bank the revenue, append it to the history and
    /// clear the sale ledger. Returns the closed revenue.
    pub fn close_cycle(&mut self) -> f64 {
        let revenue = self.revenue;
        self.funds += revenue;
        self.revenue_history.push(revenue);
        self.revenue = 0.0;
        self.sales.clear();
        revenue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn firm_with_staff(staff: u64) -> Firm {
        let mut firm = Firm::new(FirmId(100), 100.0, 10.0, 5.0, 2.0);
        for i in 0..staff {
            firm.employees.insert(PersonId(i));
        }
        firm
    }

    #[test]
    fn test_sales_deduct_and_restock_adds_catch() {
        let mut firm = firm_with_staff(3);
        firm.add_sale(5.0, 1.0);
        firm.add_sale(5.5, 1.0);
        assert_eq!(firm.stock, 8.0);
        firm.restock();
        assert_eq!(firm.stock, 8.0 + 6.0);
        assert_eq!(firm.sales().len(), 2);
    }

    #[test]
    fn test_stock_never_negative() {
        let mut firm = firm_with_staff(0);
        firm.stock = 1.0;
        firm.add_sale(5.0, 1.0);
        firm.add_sale(5.0, 1.0);
        firm.restock();
        assert_eq!(firm.stock, 0.0);
    }

    #[test]
    fn test_close_cycle_records_history() {
        let mut firm = firm_with_staff(1);
        assert_eq!(firm.last_revenue(), 0.0);
        firm.add_sale(4.0, 1.0);
        firm.add_sale(6.0, 1.0);
        assert_eq!(firm.revenue(), 10.0);
        assert_eq!(firm.close_cycle(), 10.0);
        assert_eq!(firm.revenue(), 0.0);
        assert_eq!(firm.last_revenue(), 10.0);
        assert_eq!(firm.funds, 110.0);
        assert!(firm.sales().is_empty());
        firm.close_cycle();
        assert_eq!(firm.revenue_history(), &[10.0, 0.0]);
    }
}

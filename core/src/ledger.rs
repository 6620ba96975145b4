use crate::types::{Fill, Origin, Quantity, Side};

/// Tracks the maker's own signed inventory and P&L from the fill stream.
///
/// Pure bookkeeping: the ledger has no access to the book and never mutates
/// it. Only fills whose maker leg has `origin == Maker` affect inventory —
/// those are the strategy's own realized trades; EXCHANGE-origin fills are
/// market noise the ledger doesn't care about.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ledger {
    /// Signed base-asset inventory: positive is long.
    pub inventory: i64,
    /// Volume-weighted average cost of the current inventory, in price ticks.
    /// Meaningless when `inventory == 0`.
    pub avg_cost: i64,
    /// Realized P&L in price-tick * quantity-tick units, accumulated as
    /// inventory crosses back through zero or partially offsets.
    pub realized_pnl: i128,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one fill to the ledger. Only the maker leg matters here: the
    /// maker side determines whether inventory grew or shrank.
    pub fn record_fill(&mut self, fill: &Fill, maker_side: Side) {
        if fill.maker_origin != Origin::Maker {
            return;
        }
        let signed_qty: i64 = match maker_side {
            Side::Buy => fill.size.0,
            Side::Sell => -fill.size.0,
        };
        self.apply(signed_qty, fill.price.0);
    }

    fn apply(&mut self, signed_qty: i64, price: i64) {
        if self.inventory == 0 || self.inventory.signum() == signed_qty.signum() {
            // Growing (or opening) a position: roll the average cost forward.
            let total_cost = self.avg_cost as i128 * self.inventory.unsigned_abs() as i128
                + price as i128 * signed_qty.unsigned_abs() as i128;
            self.inventory += signed_qty;
            if self.inventory != 0 {
                self.avg_cost = (total_cost / self.inventory.unsigned_abs() as i128) as i64;
            }
        } else {
            // Offsetting an existing position: realize P&L on the offset
            // portion. If the fill is larger than the open position, the
            // remainder flips the position and opens fresh at `price`.
            let offset = signed_qty.unsigned_abs().min(self.inventory.unsigned_abs());
            let direction = self.inventory.signum() as i128;
            self.realized_pnl += direction * (price as i128 - self.avg_cost as i128) * offset as i128;

            self.inventory += signed_qty;
            if signed_qty.unsigned_abs() > offset {
                self.avg_cost = price;
            }
        }
    }

    /// Unrealized P&L marking current inventory against `mark_price` (e.g.
    /// the current microprice), in the same units as `realized_pnl`.
    pub fn unrealized_pnl(&self, mark_price: i64) -> i128 {
        (mark_price as i128 - self.avg_cost as i128) * self.inventory as i128
    }

    pub fn total_pnl(&self, mark_price: i64) -> i128 {
        self.realized_pnl + self.unrealized_pnl(mark_price)
    }

    pub fn inventory_quantity(&self) -> Quantity {
        Quantity(self.inventory)
    }
}

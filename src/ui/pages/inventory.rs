use tracing::warn;

use crate::models::{format_date, summarize_stock, BloodInventory, StockSummary};
use crate::ui::forms::StockForm;
use crate::ui::table::{or_dash, Table};
use crate::ui::{Failure, Notice, Submission, Submitted};
use crate::AppContext;

pub struct InventoryPage<'a> {
    ctx: &'a AppContext,
    submission: Submission,
}

impl<'a> InventoryPage<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            submission: Submission::new(),
        }
    }

    /// All stock, or one hospital's.
    pub async fn load(&self, hospital_id: Option<i64>) -> Result<Vec<BloodInventory>, Failure> {
        let result = match hospital_id {
            Some(id) => self.ctx.api.hospital_inventory(id).await,
            None => self.ctx.api.list_inventory().await,
        };
        result.map_err(|e| Failure::from_error(e, "Failed to fetch blood inventory"))
    }

    /// Set the stock level of one inventory record.
    pub async fn update_quantity(&self, id: i64, form: &StockForm) -> Submitted<Notice> {
        self.submission.run(self.restock(id, form)).await
    }

    async fn restock(&self, id: i64, form: &StockForm) -> Result<Notice, Failure> {
        let quantity = form.validate()?;
        let mut item = self
            .load(None)
            .await?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or_else(|| {
                warn!(inventory_id = id, "Inventory record not found");
                Failure::Notice(Notice::error(format!("Inventory record #{} not found", id)))
            })?;

        item.quantity = quantity;
        self.ctx
            .api
            .update_inventory(&item)
            .await
            .map(|_| Notice::success("Inventory updated successfully"))
            .map_err(|e| Failure::from_error(e, "Failed to update inventory"))
    }

    /// Total units per blood type, the eight dashboard cards.
    pub fn dashboard(inventory: &[BloodInventory]) -> Vec<StockSummary> {
        summarize_stock(inventory)
    }

    /// Dashboard cards laid out in two rows of four.
    pub fn render_dashboard(inventory: &[BloodInventory]) -> String {
        Self::dashboard(inventory)
            .chunks(4)
            .map(|row| {
                let cards: Vec<String> = row
                    .iter()
                    .map(|card| format!("{:<10}{:>5} units", format!("{} Blood", card.blood_type), card.units))
                    .collect();
                format!("{}\n", cards.join("    "))
            })
            .collect()
    }

    pub fn table(inventory: &[BloodInventory]) -> String {
        Table::new("No inventory records found.")
            .column("ID", 6, |i: &BloodInventory| i.id.to_string())
            .column("Hospital ID", 11, |i: &BloodInventory| i.hospital_id.to_string())
            .column("Blood Type", 10, |i: &BloodInventory| i.blood_type.to_string())
            .column("Quantity (units)", 16, |i: &BloodInventory| i.quantity.to_string())
            .column("Last Updated", 12, |i: &BloodInventory| {
                or_dash(i.last_updated.as_deref().map(format_date).as_deref())
            })
            .render(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodType, Role};
    use crate::test_support::{app_context, session, FakeApi};
    use crate::ui::SubmitOutcome;
    use axum::{extract::Path, routing::{get, put}, Json, Router};
    use serde_json::{json, Value};

    fn stock() -> Value {
        json!([
            {"id": 1, "hospitalId": 1, "bloodType": "A+", "quantity": 4, "lastUpdated": "2024-05-01T08:00:00"},
            {"id": 2, "hospitalId": 2, "bloodType": "A+", "quantity": 6},
            {"id": 3, "hospitalId": 2, "bloodType": "O-", "quantity": 2}
        ])
    }

    fn inventory_api() -> Router {
        Router::new()
            .route("/blood-inventory", get(|| async { Json(stock()) }))
            .route(
                "/blood-inventory/:id",
                put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                    assert_eq!(body["id"], id);
                    assert_eq!(body["hospitalId"], 2);
                    Json(body)
                }),
            )
    }

    #[tokio::test]
    async fn test_update_quantity_sends_full_record() {
        let api = FakeApi::start(inventory_api()).await;
        let ctx = app_context(&api, Some(session(1, Role::Admin)));
        let page = InventoryPage::new(&ctx);

        let form = StockForm {
            quantity: Some("9".to_string()),
        };
        let notice = page.update_quantity(3, &form).await.completed().unwrap().unwrap();
        assert_eq!(notice.message, "Inventory updated successfully");

        let unknown = page.update_quantity(99, &form).await;
        assert!(matches!(unknown, SubmitOutcome::Completed(Err(Failure::Notice(_)))));
    }

    #[tokio::test]
    async fn test_negative_stock_makes_no_request() {
        let api = FakeApi::start(inventory_api()).await;
        let ctx = app_context(&api, Some(session(1, Role::Admin)));

        let form = StockForm {
            quantity: Some("-4".to_string()),
        };
        let outcome = InventoryPage::new(&ctx).update_quantity(1, &form).await;
        assert!(matches!(outcome, SubmitOutcome::Completed(Err(Failure::Invalid(_)))));
        assert_eq!(api.request_count(), 0);
    }

    #[test]
    fn test_dashboard_totals() {
        let inventory: Vec<BloodInventory> = serde_json::from_value(stock()).unwrap();
        let cards = InventoryPage::dashboard(&inventory);
        assert_eq!(cards[0].blood_type, BloodType::APositive);
        assert_eq!(cards[0].units, 10);

        let rendered = InventoryPage::render_dashboard(&inventory);
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.starts_with("A+ Blood     10 units"));
        assert!(rendered.lines().nth(1).unwrap().contains("O- Blood      2 units"));
    }

    #[test]
    fn test_table_formats_dates() {
        let inventory: Vec<BloodInventory> = serde_json::from_value(stock()).unwrap();
        let table = InventoryPage::table(&inventory);
        assert!(table.contains("2024-05-01"));
        assert!(!table.contains("08:00"));
    }
}

//! LedgerService: the ledger's operations.
//!
//! Each operation validates its input, makes the repository call, and maps
//! the outcome into a typed result or a [`LedgerError`]. The service holds
//! no state between calls; the store handle is injected at construction.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LedgerError;
use crate::models::{
    Entity, Item, ItemUpdated, OrderSummary, OrderUpdated, Party, PartyInfo, PartyOrder,
    PartyUpdated, Record, RecordId,
};
use crate::ports::RecordStore;
use crate::repository::{ItemRepository, PartyOrderRepository, PartyRepository};
use crate::requests::{ItemUpdate, NewItem, NewParty, NewPartyOrder, PartyOrderUpdate, PartyUpdate};
use crate::validation::Validate;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[async_trait]
pub trait LedgerService: Send + Sync {
    // ── Items ──

    async fn add_item(&self, req: NewItem) -> Result<Record<Item>>;
    async fn delete_item(&self, id: &str) -> Result<()>;
    async fn update_item(&self, id: &str, req: ItemUpdate) -> Result<ItemUpdated>;
    async fn list_items(&self) -> Result<Vec<Record<Item>>>;
    async fn search_items_by_name(&self, needle: &str) -> Result<Vec<Record<Item>>>;

    // ── Parties ──

    async fn add_party(&self, req: NewParty) -> Result<Record<Party>>;
    async fn delete_party(&self, id: &str) -> Result<()>;
    async fn update_party(&self, id: &str, req: PartyUpdate) -> Result<PartyUpdated>;
    async fn get_party_info(&self, id: &str) -> Result<PartyInfo>;
    async fn list_parties(&self) -> Result<Vec<Record<Party>>>;
    async fn search_parties_by_name(&self, needle: &str) -> Result<Vec<Record<Party>>>;

    // ── Party orders ──

    /// The party id is stored as given; no party lookup is made.
    async fn add_party_order(&self, req: NewPartyOrder) -> Result<Record<PartyOrder>>;
    async fn delete_party_order(&self, id: &str) -> Result<()>;
    async fn update_party_order(&self, id: &str, req: PartyOrderUpdate) -> Result<OrderUpdated>;
    async fn list_orders_for_party(&self, party_id: &str) -> Result<Vec<OrderSummary>>;
}

fn not_found<T: Entity>() -> LedgerError {
    LedgerError::NotFound(T::LABEL)
}

pub struct LedgerServiceImpl {
    items: ItemRepository,
    parties: PartyRepository,
    orders: PartyOrderRepository,
}

impl LedgerServiceImpl {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            items: ItemRepository::new(Arc::clone(&store)),
            parties: PartyRepository::new(Arc::clone(&store)),
            orders: PartyOrderRepository::new(store),
        }
    }
}

#[async_trait]
impl LedgerService for LedgerServiceImpl {
    async fn add_item(&self, req: NewItem) -> Result<Record<Item>> {
        let item = req.validate()?;
        let saved = self.items.create(&item).await?;
        tracing::info!(id = %saved.id, name = %saved.fields.item_name, "item added");
        Ok(saved)
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        let id = RecordId::parse(id)?;
        if !self.items.delete(id).await? {
            return Err(not_found::<Item>());
        }
        tracing::info!(%id, "item removed");
        Ok(())
    }

    async fn update_item(&self, id: &str, req: ItemUpdate) -> Result<ItemUpdated> {
        let id = RecordId::parse(id)?;
        let item = req.validate()?;
        let saved = self
            .items
            .update(id, &item)
            .await?
            .ok_or_else(not_found::<Item>)?;
        tracing::info!(%id, "item updated");
        Ok(ItemUpdated::from(&saved))
    }

    async fn list_items(&self) -> Result<Vec<Record<Item>>> {
        Ok(self.items.list().await?)
    }

    async fn search_items_by_name(&self, needle: &str) -> Result<Vec<Record<Item>>> {
        let hits = self.items.search_by_name(needle).await?;
        tracing::debug!(needle, hits = hits.len(), "item search");
        Ok(hits)
    }

    async fn add_party(&self, req: NewParty) -> Result<Record<Party>> {
        let party = req.validate()?;
        let saved = self.parties.create(&party).await?;
        tracing::info!(id = %saved.id, name = %saved.fields.party_name, "party added");
        Ok(saved)
    }

    async fn delete_party(&self, id: &str) -> Result<()> {
        let id = RecordId::parse(id)?;
        // Orders referencing this party are left in place.
        if !self.parties.delete(id).await? {
            return Err(not_found::<Party>());
        }
        tracing::info!(%id, "party removed");
        Ok(())
    }

    async fn update_party(&self, id: &str, req: PartyUpdate) -> Result<PartyUpdated> {
        let id = RecordId::parse(id)?;
        let party = req.validate()?;
        let saved = self
            .parties
            .update(id, &party)
            .await?
            .ok_or_else(not_found::<Party>)?;
        tracing::info!(%id, "party updated");
        Ok(PartyUpdated::from(&saved))
    }

    async fn get_party_info(&self, id: &str) -> Result<PartyInfo> {
        let id = RecordId::parse(id)?;
        self.parties
            .get(id)
            .await?
            .map(PartyInfo::from)
            .ok_or_else(not_found::<Party>)
    }

    async fn list_parties(&self) -> Result<Vec<Record<Party>>> {
        Ok(self.parties.list().await?)
    }

    async fn search_parties_by_name(&self, needle: &str) -> Result<Vec<Record<Party>>> {
        let hits = self.parties.search_by_name(needle).await?;
        tracing::debug!(needle, hits = hits.len(), "party search");
        Ok(hits)
    }

    async fn add_party_order(&self, req: NewPartyOrder) -> Result<Record<PartyOrder>> {
        let order = req.validate()?;
        let saved = self.orders.create(&order).await?;
        tracing::info!(id = %saved.id, party_id = %saved.fields.party_id, "party order added");
        Ok(saved)
    }

    async fn delete_party_order(&self, id: &str) -> Result<()> {
        let id = RecordId::parse(id)?;
        if !self.orders.delete(id).await? {
            return Err(not_found::<PartyOrder>());
        }
        tracing::info!(%id, "party order removed");
        Ok(())
    }

    async fn update_party_order(&self, id: &str, req: PartyOrderUpdate) -> Result<OrderUpdated> {
        let id = RecordId::parse(id)?;
        let changes = req.validate()?;
        let existing = self
            .orders
            .get(id)
            .await?
            .ok_or_else(not_found::<PartyOrder>)?;
        let saved = self
            .orders
            .update(id, &changes.apply_to(existing.fields.party_id))
            .await?
            .ok_or_else(not_found::<PartyOrder>)?;
        tracing::info!(%id, "party order updated");
        Ok(OrderUpdated::from(&saved))
    }

    async fn list_orders_for_party(&self, party_id: &str) -> Result<Vec<OrderSummary>> {
        let party_id = RecordId::parse(party_id)?;
        let orders = self.orders.list_for_party(party_id).await?;
        Ok(orders.into_iter().map(OrderSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRecordStore;
    use crate::models::Collection;
    use crate::requests::Numeric;
    use serde_json::json;

    fn service() -> (Arc<MemoryRecordStore>, LedgerServiceImpl) {
        let store = Arc::new(MemoryRecordStore::new());
        let svc = LedgerServiceImpl::new(store.clone());
        (store, svc)
    }

    fn new_item(name: &str, price: f64, qty: f64) -> NewItem {
        NewItem {
            item_name: Some(name.into()),
            selling_price: Some(Numeric::Number(price)),
            quantity: Some(Numeric::Number(qty)),
        }
    }

    fn new_party(name: &str, mobile: &str) -> NewParty {
        serde_json::from_value(json!({ "partyName": name, "mobileNo": mobile })).unwrap()
    }

    const UNKNOWN_ID: &str = "00000000-0000-4000-8000-000000000001";

    #[tokio::test]
    async fn add_item_short_name_persists_nothing() {
        let (store, svc) = service();
        for name in ["", "a", "ab", "  ab  "] {
            let err = svc.add_item(new_item(name, 1.0, 1.0)).await.unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)), "{name:?}");
        }
        assert_eq!(store.count(Collection::Items).await, 0);
    }

    #[tokio::test]
    async fn add_then_list_round_trip() {
        let (_, svc) = service();
        let saved = svc.add_item(new_item("Widget", 10.0, 5.0)).await.unwrap();
        let items = svc.list_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, saved.id);
        assert_eq!(items[0].fields.item_name, "Widget");
        assert_eq!(items[0].fields.selling_price, 10.0);
        assert_eq!(items[0].fields.quantity, 5.0);
    }

    #[tokio::test]
    async fn delete_is_not_idempotent() {
        let (_, svc) = service();
        let saved = svc.add_item(new_item("Widget", 1.0, 1.0)).await.unwrap();
        let id = saved.id.to_string();
        svc.delete_item(&id).await.unwrap();
        let err = svc.delete_item(&id).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound("Item")));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found_and_leave_storage_alone() {
        let (store, svc) = service();
        svc.add_item(new_item("Widget", 1.0, 1.0)).await.unwrap();
        let update = ItemUpdate {
            item_name: Some("Other".into()),
            ..Default::default()
        };
        assert!(matches!(
            svc.delete_item(UNKNOWN_ID).await,
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            svc.update_item(UNKNOWN_ID, update).await,
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            svc.get_party_info(UNKNOWN_ID).await,
            Err(LedgerError::NotFound("Party"))
        ));
        assert_eq!(store.count(Collection::Items).await, 1);
        assert_eq!(svc.list_items().await.unwrap()[0].fields.item_name, "Widget");
    }

    #[tokio::test]
    async fn malformed_ids_rejected_everywhere() {
        let (_, svc) = service();
        let bad = "not-an-id";
        assert!(matches!(svc.delete_item(bad).await, Err(LedgerError::InvalidId(_))));
        assert!(matches!(
            svc.update_item(bad, ItemUpdate::default()).await,
            Err(LedgerError::InvalidId(_))
        ));
        assert!(matches!(svc.delete_party(bad).await, Err(LedgerError::InvalidId(_))));
        assert!(matches!(
            svc.update_party(bad, PartyUpdate::default()).await,
            Err(LedgerError::InvalidId(_))
        ));
        assert!(matches!(svc.get_party_info(bad).await, Err(LedgerError::InvalidId(_))));
        assert!(matches!(
            svc.delete_party_order(bad).await,
            Err(LedgerError::InvalidId(_))
        ));
        assert!(matches!(
            svc.update_party_order(bad, PartyOrderUpdate::default()).await,
            Err(LedgerError::InvalidId(_))
        ));
        assert!(matches!(
            svc.list_orders_for_party(bad).await,
            Err(LedgerError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn update_item_overwrites_all_fields() {
        let (_, svc) = service();
        let saved = svc.add_item(new_item("Widget", 10.0, 5.0)).await.unwrap();
        let updated = svc
            .update_item(
                &saved.id.to_string(),
                ItemUpdate {
                    item_name: Some("Wd".into()),
                    selling_price: Some(Numeric::Number(3.0)),
                    quantity: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.item_name, "Wd");
        assert_eq!(updated.selling_price, 3.0);
        assert_eq!(updated.quantity, 0.0);
        let stored = &svc.list_items().await.unwrap()[0];
        assert_eq!(stored.created_at, saved.created_at);
        assert_eq!(stored.fields.quantity, 0.0);
    }

    #[tokio::test]
    async fn search_items_case_insensitive_and_empty_is_ok() {
        let (_, svc) = service();
        svc.add_item(new_item("Widget", 1.0, 1.0)).await.unwrap();
        let hits = svc.search_items_by_name("wid").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fields.item_name, "Widget");
        assert!(svc.search_items_by_name("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_party_short_mobile_leaves_party_unchanged() {
        let (_, svc) = service();
        let saved = svc.add_party(new_party("Acme", "987654321")).await.unwrap();
        let err = svc
            .update_party(&saved.id.to_string(), new_party("Acme Ltd", "1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        let info = svc.get_party_info(&saved.id.to_string()).await.unwrap();
        assert_eq!(info.party_name, "Acme");
        assert_eq!(info.mobile_no, 987_654_321);
    }

    #[tokio::test]
    async fn party_info_projection() {
        let (_, svc) = service();
        let saved = svc.add_party(new_party("Acme", "987654321")).await.unwrap();
        let info = svc.get_party_info(&saved.id.to_string()).await.unwrap();
        assert_eq!(info.id, saved.id);
        assert_eq!(info.created_at, saved.created_at);
        let hits = svc.search_parties_by_name("ACM").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(svc.list_parties().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn order_for_unknown_party_is_accepted_and_listed() {
        let (_, svc) = service();
        let req: NewPartyOrder = serde_json::from_value(json!({
            "partyId": UNKNOWN_ID,
            "itemName": "Bolts",
            "quantity": 4,
            "amount": 20
        }))
        .unwrap();
        let saved = svc.add_party_order(req).await.unwrap();
        let orders = svc.list_orders_for_party(UNKNOWN_ID).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, saved.id);
        assert_eq!(orders[0].quantity, 4.0);
        assert_eq!(orders[0].amount, 20.0);
    }

    #[tokio::test]
    async fn deleting_party_keeps_its_orders() {
        let (store, svc) = service();
        let party = svc.add_party(new_party("Acme", "987654321")).await.unwrap();
        let req: NewPartyOrder = serde_json::from_value(json!({
            "partyId": party.id.to_string(),
            "itemName": "Bolts"
        }))
        .unwrap();
        svc.add_party_order(req).await.unwrap();
        svc.delete_party(&party.id.to_string()).await.unwrap();
        assert_eq!(store.count(Collection::PartyOrders).await, 1);
        assert_eq!(
            svc.list_orders_for_party(&party.id.to_string())
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn delete_party_order_removes_the_order() {
        let (store, svc) = service();
        let req: NewPartyOrder = serde_json::from_value(json!({
            "partyId": UNKNOWN_ID,
            "itemName": "Bolts"
        }))
        .unwrap();
        let saved = svc.add_party_order(req).await.unwrap();
        svc.delete_party_order(&saved.id.to_string()).await.unwrap();
        assert_eq!(store.count(Collection::PartyOrders).await, 0);
        assert!(matches!(
            svc.delete_party_order(&saved.id.to_string()).await,
            Err(LedgerError::NotFound("Order"))
        ));
    }

    #[tokio::test]
    async fn update_party_order_keeps_party_id() {
        let (_, svc) = service();
        let req: NewPartyOrder = serde_json::from_value(json!({
            "partyId": UNKNOWN_ID,
            "itemName": "Bolts",
            "quantity": 1,
            "amount": 1
        }))
        .unwrap();
        let saved = svc.add_party_order(req).await.unwrap();
        let updated = svc
            .update_party_order(
                &saved.id.to_string(),
                PartyOrderUpdate {
                    item_name: Some("Nuts".into()),
                    quantity: Some(Numeric::Number(9.0)),
                    amount: Some(Numeric::Number(45.0)),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.item_name, "Nuts");
        let orders = svc.list_orders_for_party(UNKNOWN_ID).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].amount, 45.0);
    }
}

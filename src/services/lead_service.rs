use mongodb::bson::{doc, oid::ObjectId};

use crate::database::{self, DocumentStore, LEADS};
use crate::models::{CreateLeadRequest, Customer, Lead, LeadResponse, LeadStatus};
use crate::utils::AppError;

pub const LIST_LIMIT: i64 = 100;

pub async fn create_lead(
    store: &dyn DocumentStore,
    customer: &Customer,
    request: CreateLeadRequest,
) -> Result<ObjectId, AppError> {
    let lead = Lead {
        id: None,
        customer_id: customer.id_hex(),
        name: request.name,
        email: request.email,
        phone: request.phone,
        source: request.source,
        status: LeadStatus::New,
        notes: None,
    };

    Ok(database::insert_record(store, LEADS, &lead).await?)
}

/// Leads owned by `customer`, at most [`LIST_LIMIT`], store-default order.
pub async fn list_leads(store: &dyn DocumentStore, customer: &Customer) -> Result<Vec<LeadResponse>, AppError> {
    let leads: Vec<Lead> = database::find_records(
        store,
        LEADS,
        doc! { "customer_id": customer.id_hex() },
        LIST_LIMIT,
    )
    .await?;

    Ok(leads.into_iter().map(LeadResponse::from).collect())
}

/// Finds `lead_id` only if `customer` owns it.
///
/// Unparsable ids, missing leads and leads of other customers are all `None`.
pub async fn find_owned_lead(
    store: &dyn DocumentStore,
    customer: &Customer,
    lead_id: &str,
) -> Result<Option<Lead>, AppError> {
    let Ok(id) = ObjectId::parse_str(lead_id.trim()) else {
        return Ok(None);
    };

    Ok(database::find_record(store, LEADS, doc! { "_id": id, "customer_id": customer.id_hex() }).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    fn customer(email: &str) -> Customer {
        Customer {
            id: Some(ObjectId::new()),
            name: "Acme".into(),
            email: email.into(),
            password_hash: "pw".into(),
            is_active: true,
        }
    }

    fn request(name: &str) -> CreateLeadRequest {
        CreateLeadRequest {
            name: name.into(),
            email: Some("jane@example.com".into()),
            phone: None,
            source: Some("facebook".into()),
        }
    }

    #[tokio::test]
    async fn created_lead_is_owned_by_caller_with_status_new() {
        let store = MemoryStore::new();
        let a = customer("a@x.com");

        let id = create_lead(&store, &a, request("Jane")).await.unwrap();
        let leads = list_leads(&store, &a).await.unwrap();

        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].id, id.to_hex());
        assert_eq!(leads[0].name, "Jane");
        assert_eq!(leads[0].customer_id, a.id_hex());
        assert_eq!(leads[0].status, LeadStatus::New);
        assert_eq!(leads[0].source.as_deref(), Some("facebook"));
        assert!(leads[0].notes.is_none());
    }

    #[tokio::test]
    async fn list_never_returns_other_tenants_leads() {
        let store = MemoryStore::new();
        let a = customer("a@x.com");
        let b = customer("b@x.com");

        create_lead(&store, &a, request("Jane")).await.unwrap();
        create_lead(&store, &a, request("John")).await.unwrap();
        create_lead(&store, &b, request("Mary")).await.unwrap();

        let for_a = list_leads(&store, &a).await.unwrap();
        let for_b = list_leads(&store, &b).await.unwrap();

        assert_eq!(for_a.len(), 2);
        assert!(for_a.iter().all(|l| l.customer_id == a.id_hex()));
        assert_eq!(for_b.len(), 1);
        assert_eq!(for_b[0].name, "Mary");
    }

    #[tokio::test]
    async fn list_is_capped() {
        let store = MemoryStore::new();
        let a = customer("a@x.com");
        for i in 0..(LIST_LIMIT + 5) {
            create_lead(&store, &a, request(&format!("lead {}", i))).await.unwrap();
        }

        let leads = list_leads(&store, &a).await.unwrap();
        assert_eq!(leads.len(), LIST_LIMIT as usize);
    }

    #[tokio::test]
    async fn find_owned_lead_hides_foreign_and_invalid_ids() {
        let store = MemoryStore::new();
        let a = customer("a@x.com");
        let b = customer("b@x.com");
        let id = create_lead(&store, &a, request("Jane")).await.unwrap();

        assert!(find_owned_lead(&store, &a, &id.to_hex()).await.unwrap().is_some());
        assert!(find_owned_lead(&store, &b, &id.to_hex()).await.unwrap().is_none());
        assert!(find_owned_lead(&store, &a, "not-an-object-id").await.unwrap().is_none());
        assert!(find_owned_lead(&store, &a, &ObjectId::new().to_hex()).await.unwrap().is_none());
    }
}

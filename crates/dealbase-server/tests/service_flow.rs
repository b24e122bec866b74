//! End-to-end service flows against a throwaway database.

use dealbase_proto::{
    CustomerPatch, DealStatus, Money, NewCompany, NewCustomer, NewDeal,
};
use dealbase_server::{CompanyService, CustomerService, DealService, Database, Error};

fn temp_db() -> Database {
    Database::temporary().unwrap()
}

fn create_customer(db: &Database, name: &str, company_id: u64) -> dealbase_proto::Customer {
    CustomerService::new(db)
        .create(NewCustomer {
            name: name.to_string(),
            email: format!("{}@example.test", name.to_lowercase()),
            phone: None,
            company_id,
        })
        .unwrap()
}

fn create_deal(db: &Database, customer_id: u64, company_id: u64) -> dealbase_proto::Deal {
    DealService::new(db)
        .create(NewDeal {
            description: "Annual license".to_string(),
            amount: Money::try_from_f64(12345.67).unwrap(),
            status: Default::default(),
            customer_id,
            company_id,
        })
        .unwrap()
}

#[test]
fn ids_are_unique_and_ascending_per_kind() {
    let db = temp_db();
    let companies = CompanyService::new(&db);

    let mut previous = 0;
    for i in 0..5 {
        let company = companies.create(NewCompany::named(format!("c{}", i))).unwrap();
        assert!(company.id > previous);
        previous = company.id;
    }

    // Customers get their own id sequence.
    let customer = create_customer(&db, "Ada", 1);
    assert_eq!(customer.id, 1);
}

#[test]
fn created_records_have_equal_timestamps() {
    let db = temp_db();
    let company = CompanyService::new(&db)
        .create(NewCompany::named("Acme"))
        .unwrap();
    assert_eq!(company.created_at, company.updated_at);

    let customer = create_customer(&db, "Ada", company.id);
    assert_eq!(customer.created_at, customer.updated_at);

    let deal = create_deal(&db, customer.id, company.id);
    assert_eq!(deal.created_at, deal.updated_at);
}

#[test]
fn partial_update_leaves_unsupplied_fields_unchanged() {
    let db = temp_db();
    let company = CompanyService::new(&db)
        .create(NewCompany::named("Acme"))
        .unwrap();
    let customer = create_customer(&db, "Ada", company.id);

    let updated = CustomerService::new(&db)
        .update(CustomerPatch::new(customer.id).with_name("Ada L."))
        .unwrap();

    assert_eq!(updated.name, "Ada L.");
    assert_eq!(updated.email, customer.email);
    assert_eq!(updated.phone, customer.phone);
    assert_eq!(updated.company_id, customer.company_id);
    assert_eq!(updated.created_at, customer.created_at);
    assert!(updated.updated_at > customer.updated_at);

    // A second update strictly increases updated_at again.
    let again = CustomerService::new(&db)
        .update(CustomerPatch::new(customer.id).with_phone(Some("555-0100".into())))
        .unwrap();
    assert!(again.updated_at > updated.updated_at);
}

#[test]
fn amount_round_trips_without_drift() {
    let db = temp_db();
    let company = CompanyService::new(&db)
        .create(NewCompany::named("Acme"))
        .unwrap();
    let customer = create_customer(&db, "Ada", company.id);
    let deal = create_deal(&db, customer.id, company.id);

    let fetched = DealService::new(&db).get(deal.id).unwrap();
    assert_eq!(fetched.amount.to_f64(), 12345.67);
}

#[test]
fn restrict_on_delete_lifecycle() {
    let db = temp_db();
    let companies = CompanyService::new(&db);
    let customers = CustomerService::new(&db);
    let deals = DealService::new(&db);

    // Create Company "Acme" with all optional fields null.
    let acme = companies.create(NewCompany::named("Acme")).unwrap();
    assert_eq!(acme.industry, None);
    assert_eq!(acme.website, None);
    assert_eq!(acme.phone, None);
    assert_eq!(acme.address, None);

    // Customer "Ada" belongs to Acme; deleting Acme now conflicts on
    // customers.
    let ada = create_customer(&db, "Ada", acme.id);
    let err = companies.delete(acme.id).unwrap_err();
    match &err {
        Error::Conflict(reason) => {
            assert_eq!(reason, "cannot delete company with existing customers")
        }
        other => panic!("expected conflict, got {:?}", other),
    }
    assert!(companies.get(acme.id).is_ok());

    // With a deal in place, the deals conflict wins over the customers one.
    let deal = create_deal(&db, ada.id, acme.id);
    let err = companies.delete(acme.id).unwrap_err();
    match &err {
        Error::Conflict(reason) => {
            assert_eq!(reason, "cannot delete company with existing deals")
        }
        other => panic!("expected conflict, got {:?}", other),
    }

    // Ada cannot be deleted while her deal lives; the message carries the
    // count.
    let err = customers.delete(ada.id).unwrap_err();
    match &err {
        Error::Conflict(reason) => assert_eq!(
            reason,
            &format!(
                "cannot delete customer with ID {} because it has 1 associated deal(s)",
                ada.id
            )
        ),
        other => panic!("expected conflict, got {:?}", other),
    }
    assert!(customers.get(ada.id).is_ok());

    // Removing the deal unblocks the chain bottom-up.
    assert!(deals.delete(deal.id).unwrap().success);
    assert!(customers.delete(ada.id).unwrap().success);
    assert!(companies.delete(acme.id).unwrap().success);

    assert!(matches!(
        companies.get(acme.id).unwrap_err(),
        Error::NotFound(_)
    ));
}

#[test]
fn not_found_paths_reference_the_offending_id() {
    let db = temp_db();

    let err = CompanyService::new(&db).get(1234).unwrap_err();
    match &err {
        Error::NotFound(message) => assert!(message.contains("1234")),
        other => panic!("expected not found, got {:?}", other),
    }

    // updateDeal with a nonexistent customer_id fails before any row is
    // modified.
    let company = CompanyService::new(&db)
        .create(NewCompany::named("Acme"))
        .unwrap();
    let customer = create_customer(&db, "Ada", company.id);
    let deal = create_deal(&db, customer.id, company.id);

    let err = DealService::new(&db)
        .update(
            dealbase_proto::DealPatch::new(deal.id)
                .with_customer(777)
                .with_status(DealStatus::Won),
        )
        .unwrap_err();
    match &err {
        Error::NotFound(message) => assert!(message.contains("777")),
        other => panic!("expected not found, got {:?}", other),
    }

    let untouched = DealService::new(&db).get(deal.id).unwrap();
    assert_eq!(untouched, deal);
    assert_eq!(untouched.status, DealStatus::New);
}

#[test]
fn company_listing_orders_by_creation_time() {
    let db = temp_db();
    let companies = CompanyService::new(&db);

    for name in ["alpha", "beta", "gamma"] {
        companies.create(NewCompany::named(name)).unwrap();
    }

    let listed = companies.list().unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.windows(2).all(|w| w[0].created_at < w[1].created_at));
    let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
}

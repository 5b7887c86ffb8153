use parcel_core::db::open_db_in_memory;
use parcel_core::{ParcelService, ParcelStatus, ParcelStore, ServiceError, SqliteParcelStore};

#[test]
fn register_returns_stored_parcel() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());

    let parcel = service.register(1000, "test").unwrap();
    assert!(parcel.is_persisted());
    assert_eq!(parcel.status, ParcelStatus::Registered);
    assert_eq!(service.parcel(parcel.number).unwrap(), parcel);
}

#[test]
fn dispatch_then_deliver_follows_workflow() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let number = service.register(1000, "test").unwrap().number;

    service.dispatch(number).unwrap();
    assert_eq!(service.parcel(number).unwrap().status, ParcelStatus::Sent);

    service.deliver(number).unwrap();
    assert_eq!(service.parcel(number).unwrap().status, ParcelStatus::Delivered);
}

#[test]
fn skipping_or_repeating_steps_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let number = service.register(1000, "test").unwrap().number;

    let err = service.deliver(number).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidTransition {
            from: ParcelStatus::Registered,
            to: ParcelStatus::Delivered,
            ..
        }
    ));

    service.dispatch(number).unwrap();
    let err = service.dispatch(number).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    assert_eq!(service.parcel(number).unwrap().status, ParcelStatus::Sent);
}

#[test]
fn address_is_locked_after_dispatch() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let number = service.register(1000, "test").unwrap().number;

    service.change_address(number, "new test address").unwrap();
    assert_eq!(service.parcel(number).unwrap().address, "new test address");

    service.dispatch(number).unwrap();
    let err = service.change_address(number, "too late").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::AddressLocked {
            status: ParcelStatus::Sent,
            ..
        }
    ));
    assert_eq!(service.parcel(number).unwrap().address, "new test address");
}

#[test]
fn cancel_removes_only_registered_parcels() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let kept = service.register(1000, "kept").unwrap().number;
    let dropped = service.register(1000, "dropped").unwrap().number;

    service.dispatch(kept).unwrap();
    assert!(matches!(
        service.cancel(kept).unwrap_err(),
        ServiceError::NotCancellable { .. }
    ));

    service.cancel(dropped).unwrap();
    assert!(matches!(
        service.parcel(dropped).unwrap_err(),
        ServiceError::NotFound(number) if number == dropped
    ));

    let remaining = service.client_parcels(1000).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].number, kept);
}

#[test]
fn missing_parcels_surface_as_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());

    assert!(matches!(service.dispatch(404), Err(ServiceError::NotFound(404))));
    assert!(matches!(
        service.change_address(404, "x"),
        Err(ServiceError::NotFound(404))
    ));
    assert!(matches!(service.cancel(404), Err(ServiceError::NotFound(404))));
}

#[test]
fn service_does_not_change_store_contract() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let number = service.register(1000, "test").unwrap().number;

    store.set_status(number, ParcelStatus::Delivered).unwrap();
    store.set_address(number, "rewritten").unwrap();

    let parcel = service.parcel(number).unwrap();
    assert_eq!(parcel.status, ParcelStatus::Delivered);
    assert_eq!(parcel.address, "rewritten");
}

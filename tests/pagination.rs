use parking_reservation_api::routes::params::{LotListQuery, Pagination};

fn paging(page: Option<i64>, per_page: Option<i64>) -> (i64, i64, i64) {
    Pagination { page, per_page }.normalize()
}

#[test]
fn defaults_to_first_page_of_twenty() {
    assert_eq!(paging(None, None), (1, 20, 0));
}

#[test]
fn page_and_size_are_clamped() {
    assert_eq!(paging(Some(0), Some(0)), (1, 1, 0));
    assert_eq!(paging(Some(-5), Some(500)), (1, 100, 0));
    assert_eq!(paging(Some(3), Some(10)), (3, 10, 20));
}

#[test]
fn huge_page_saturates_instead_of_overflowing() {
    let (page, per_page, offset) = paging(Some(i64::MAX), Some(100));

    assert_eq!(page, i64::MAX);
    assert_eq!(per_page, 100);
    assert_eq!(offset, i64::MAX);
    assert!(offset as u64 <= i64::MAX as u64);
}

#[test]
fn list_queries_forward_their_paging_fields() {
    let query = LotListQuery {
        page: Some(2),
        per_page: Some(5),
        postal_code: None,
    };
    assert_eq!(query.pagination().normalize(), (2, 5, 5));
}

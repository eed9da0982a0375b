//! Integration tests for response decoding and normalization.
//!
//! Each test feeds a realistic eBay XML body through the decoder and the
//! normalizer, the same path `TradingRequest::run` takes.

use ebay_trading::response::{cast, normalize};
use ebay_trading::wire::parse_document;
use ebay_trading::{Definitions, NormalizedResult, Pagination, RequestError, Value};

fn normalize_xml(xml: &str, verb: &str) -> Result<NormalizedResult, RequestError> {
    let tree = parse_document(xml)?;
    normalize(&tree, verb, &Definitions::standard())
}

const SINGLE_ORDER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GetOrdersResponse xmlns="urn:ebay:apis:eBLBaseComponents">
  <Timestamp>2024-03-01T12:00:00.000Z</Timestamp>
  <Ack>Success</Ack>
  <Version>1173</Version>
  <Build>E1173_CORE_APIXO_19146596_R1</Build>
  <OrderArray>
    <Order>
      <OrderID>865826</OrderID>
      <OrderStatus>Completed</OrderStatus>
      <CreatedTime>2024-02-28T09:15:00.000Z</CreatedTime>
      <IsMultiLegShipping>false</IsMultiLegShipping>
    </Order>
  </OrderArray>
  <HasMoreOrders>false</HasMoreOrders>
  <OrdersPerPage>100</OrdersPerPage>
  <PageNumber>1</PageNumber>
  <ReturnedOrderCountActual>1</ReturnedOrderCountActual>
</GetOrdersResponse>"#;

#[test]
fn test_single_order_is_coerced_into_a_sequence() {
    let result = normalize_xml(SINGLE_ORDER, "GetOrders").unwrap();

    let results = result.results();
    assert_eq!(results.len(), 1);

    let order = &results[0];
    assert_eq!(order.get("OrderID"), Some(&Value::from("865826")));
    assert_eq!(order.get("IsMultiLegShipping"), Some(&Value::Bool(false)));
    assert!(order.get("CreatedTime").and_then(Value::as_date).is_some());
}

#[test]
fn test_top_level_fields_are_cast_and_noise_is_dropped() {
    let result = normalize_xml(SINGLE_ORDER, "GetOrders").unwrap();

    assert_eq!(result.get("Ack"), Some(&Value::from("Success")));
    assert_eq!(result.get("HasMoreOrders"), Some(&Value::Bool(false)));
    assert_eq!(result.get("OrdersPerPage"), Some(&Value::from(100_u64)));
    assert_eq!(result.get("PageNumber"), Some(&Value::from(1_u64)));
    assert!(result.get("OrderArray").is_none());
    for noise in ["xmlns", "Timestamp", "Version", "Build"] {
        assert!(result.get(noise).is_none(), "{noise} should be dropped");
    }
    assert!(result.pagination.is_none());
}

#[test]
fn test_nested_list_pagination_and_items() {
    let xml = r#"<GetMyeBaySellingResponse xmlns="urn:ebay:apis:eBLBaseComponents">
      <Ack>Success</Ack>
      <ActiveList>
        <ItemArray>
          <Item><ItemID>1</ItemID><Quantity>3</Quantity></Item>
          <Item><ItemID>2</ItemID><Quantity>5</Quantity></Item>
        </ItemArray>
        <PaginationResult>
          <TotalNumberOfPages>4</TotalNumberOfPages>
          <TotalNumberOfEntries>8</TotalNumberOfEntries>
        </PaginationResult>
      </ActiveList>
    </GetMyeBaySellingResponse>"#;

    let result = normalize_xml(xml, "GetMyeBaySelling").unwrap();

    assert_eq!(
        result.pagination,
        Some(Pagination {
            pages: 4,
            length: 8
        })
    );
    let quantities: Vec<_> = result
        .results()
        .iter()
        .map(|item| item.get("Quantity").and_then(Value::as_u64))
        .collect();
    assert_eq!(quantities, vec![Some(3), Some(5)]);
    assert!(result.get("ActiveList").is_none());
}

#[test]
fn test_top_level_pagination_result() {
    let xml = r#"<GetSellerListResponse>
      <Ack>Success</Ack>
      <PaginationResult>
        <TotalNumberOfPages>2</TotalNumberOfPages>
        <TotalNumberOfEntries>150</TotalNumberOfEntries>
      </PaginationResult>
      <ItemArray><Item><ItemID>9</ItemID></Item></ItemArray>
    </GetSellerListResponse>"#;

    let result = normalize_xml(xml, "GetSellerList").unwrap();
    assert_eq!(
        result.pagination,
        Some(Pagination {
            pages: 2,
            length: 150
        })
    );
    assert_eq!(result.results().len(), 1);
    assert!(result.get("PaginationResult").is_none());
}

#[test]
fn test_empty_collection_yields_empty_results() {
    let xml = "<GetOrdersResponse><Ack>Success</Ack><OrderArray/></GetOrdersResponse>";
    let result = normalize_xml(xml, "GetOrders").unwrap();
    assert_eq!(result.results, Some(vec![]));
}

#[test]
fn test_ack_failure_wins_over_pagination() {
    let xml = r#"<GetMyeBaySellingResponse>
      <Ack>Failure</Ack>
      <Errors>
        <ShortMessage>Invalid token.</ShortMessage>
        <LongMessage>The auth token is invalid or has expired.</LongMessage>
        <ErrorCode>932</ErrorCode>
        <SeverityCode>Error</SeverityCode>
      </Errors>
      <ActiveList>
        <ItemArray><Item><ItemID>1</ItemID></Item></ItemArray>
        <PaginationResult><TotalNumberOfPages>3</TotalNumberOfPages></PaginationResult>
      </ActiveList>
    </GetMyeBaySellingResponse>"#;

    let error = match normalize_xml(xml, "GetMyeBaySelling") {
        Err(RequestError::Api(error)) => error,
        other => panic!("expected an API error, got {other:?}"),
    };
    assert_eq!(error.message, "The auth token is invalid or has expired.");
    assert_eq!(error.ack, "Failure");
    assert_eq!(error.code.as_deref(), Some("932"));
    assert_eq!(
        error.errors.get("SeverityCode"),
        Some(&Value::from("Error"))
    );
}

#[test]
fn test_ack_error_is_also_a_failure() {
    let xml = "<GetItemResponse><Ack>Error</Ack>\
               <Errors><ShortMessage>Item not found.</ShortMessage></Errors></GetItemResponse>";
    assert!(matches!(
        normalize_xml(xml, "GetItem"),
        Err(RequestError::Api(ref e)) if e.message == "Item not found."
    ));
}

#[test]
fn test_wrong_wrapper_is_reported() {
    let xml = "<GetItemResponse><Ack>Success</Ack></GetItemResponse>";
    assert!(matches!(
        normalize_xml(xml, "GetOrders"),
        Err(RequestError::NoResponseWrapper { ref wrapper }) if wrapper == "GetOrdersResponse"
    ));
}

#[test]
fn test_malformed_body_is_an_xml_error() {
    assert!(matches!(
        normalize_xml("<GetItemResponse><Ack>", "GetItem"),
        Err(RequestError::Xml(_))
    ));
}

#[test]
fn test_cast_priority_with_standard_tables() {
    let defs = Definitions::standard();

    assert_eq!(cast("true", "TotalNumberOfEntries", &defs), Value::Bool(true));
    assert_eq!(cast("42", "TotalNumberOfEntries", &defs), Value::from(42_u64));
    assert_eq!(cast("42", "SellerUserID", &defs), Value::from("42"));
    assert!(cast("2024-01-01", "StartTime", &defs).as_date().is_some());
}

#[test]
fn test_normalized_result_serializes_flat() {
    let result = normalize_xml(SINGLE_ORDER, "GetOrders").unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["Ack"], "Success");
    assert_eq!(json["results"][0]["OrderID"], "865826");
    assert_eq!(json["results"][0]["CreatedTime"], "2024-02-28T09:15:00Z");
    assert!(json.get("pagination").is_none());
}

use mailchimp_audience::test_support::MockTransport;
use mailchimp_audience::{
    AudienceClient, InterestFlags, InterestsInput, MemberStatus, MergeFields, email_hash,
};
use reqwest::Method;
use serde_json::{Value, json};
use std::sync::Arc;

const EMAIL: &str = "clyde@example.com";

fn member_path() -> String {
    format!("/lists/l1/members/{}", email_hash(EMAIL))
}

/// Echo the upsert body back as the member record, like the platform does.
fn upsert_echo() -> MockTransport {
    MockTransport::new()
        .respond_with(Method::PUT, member_path(), |payload| {
            let body = payload.cloned().unwrap_or(Value::Null);
            json!({
                "id": email_hash(EMAIL),
                "email_address": body["email_address"],
                "status": body.get("status").cloned().unwrap_or(json!("subscribed")),
                "interests": body.get("interests").cloned().unwrap_or(json!({})),
            })
        })
        .route(
            Method::GET,
            "/lists/l1/interest-categories",
            json!({"categories": [{"id": "c1", "title": "Membership"}]}),
        )
        .route(
            Method::GET,
            "/lists/l1/interest-categories/c1/interests",
            json!({"interests": [{"id": "id1", "name": "Free"}, {"id": "id2", "name": "Paid"}]}),
        )
}

fn upsert_payload(mock: &MockTransport) -> Value {
    let calls = mock.calls_to(Method::PUT, &member_path());
    assert_eq!(calls.len(), 1, "exactly one upsert per call");
    calls[0].payload.clone().expect("upsert has a body")
}

#[test]
fn email_hash_is_stable() {
    // md5("clyde@example.com"), fixed across processes
    assert_eq!(email_hash(EMAIL), "e44a75a459a26e4f10b198c0abaf92af");
    assert_eq!(email_hash("CLYDE@example.com"), email_hash(EMAIL));
}

#[tokio::test]
async fn omitted_status_defaults_only_status_if_new() {
    let mock = Arc::new(upsert_echo());
    let client = AudienceClient::with_transport(mock.clone());

    client
        .update_user("l1", EMAIL, None, None, None)
        .await
        .expect("upsert succeeds");

    let payload = upsert_payload(&mock);
    assert_eq!(payload["status_if_new"], "subscribed");
    assert!(payload.get("status").is_none());
    assert!(payload.get("interests").is_none());
    assert!(payload.get("merge_fields").is_none());
}

#[tokio::test]
async fn unsubscribe_sets_both_status_fields() {
    let mock = Arc::new(upsert_echo());
    let client = AudienceClient::with_transport(mock.clone());

    let member = client.unsubscribe("l1", EMAIL).await.unwrap();

    let payload = upsert_payload(&mock);
    assert_eq!(payload["status"], "unsubscribed");
    assert_eq!(payload["status_if_new"], "unsubscribed");
    assert!(payload.get("interests").is_none());
    assert_eq!(member.status, Some(MemberStatus::Unsubscribed));
}

#[tokio::test]
async fn subscribe_resolves_spec_and_sends_merge_fields() {
    let mock = Arc::new(upsert_echo());
    let client = AudienceClient::with_transport(mock.clone());

    let member = client
        .subscribe(
            "l1",
            EMAIL,
            Some(InterestsInput::from("Membership:Paid")),
            Some(MergeFields::from([
                ("FNAME".to_string(), "Clyde".to_string()),
                ("LNAME".to_string(), "Barrow".to_string()),
            ])),
        )
        .await
        .unwrap();

    let payload = upsert_payload(&mock);
    assert_eq!(
        payload,
        json!({
            "email_address": EMAIL,
            "status": "subscribed",
            "status_if_new": "subscribed",
            "interests": {"id2": true},
            "merge_fields": {"FNAME": "Clyde", "LNAME": "Barrow"}
        })
    );
    assert_eq!(member.interests.get("id2"), Some(&true));
}

#[tokio::test]
async fn resolved_interests_are_sent_without_lookup() {
    let mock = Arc::new(upsert_echo());
    let client = AudienceClient::with_transport(mock.clone());
    let flags = InterestFlags::from([("id1".to_string(), false), ("id2".to_string(), true)]);

    client
        .update_user("l1", EMAIL, Some(flags.into()), None, Some(MemberStatus::Pending))
        .await
        .unwrap();

    assert_eq!(mock.calls().len(), 1);
    let payload = upsert_payload(&mock);
    assert_eq!(payload["interests"], json!({"id1": false, "id2": true}));
    assert_eq!(payload["status"], "pending");
}

#[tokio::test]
async fn unmatched_interest_names_omit_interests() {
    let mock = Arc::new(upsert_echo());
    let client = AudienceClient::with_transport(mock.clone());

    client
        .update_user(
            "l1",
            EMAIL,
            Some(InterestsInput::from("Unknown:Thing")),
            None,
            None,
        )
        .await
        .unwrap();

    assert!(upsert_payload(&mock).get("interests").is_none());
}

#[tokio::test]
async fn get_member_addresses_by_normalized_hash() {
    let mock = Arc::new(MockTransport::new().route(
        Method::GET,
        member_path(),
        json!({"id": email_hash(EMAIL), "email_address": EMAIL, "status": "cleaned"}),
    ));
    let client = AudienceClient::with_transport(mock);

    let member = client.get_member("l1", " Clyde@Example.COM ").await.unwrap();
    assert_eq!(member.status, Some(MemberStatus::Cleaned));
}

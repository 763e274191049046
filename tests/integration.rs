//! End-to-end flow against a mock Zoho service: open a session, dispatch
//! calls, interpret the replies.

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zoho_api::{response, Credentials, Element, ErrorKind, Params, Session, ZohoClient, ZohoService};

struct Crm;

impl ZohoService for Crm {
    fn service_name(&self) -> &str {
        "ZohoCRM"
    }
}

const TICKET_BODY: &str = "#\n#Sun Jun 27 20:10:30 PDT 2010\nGETUSERNAME=null\nWARNING=null\nPASS_EXPIRY=-1\nTICKET=3bc26b16d97473a1245dbf93a5dcd153\nRESULT=TRUE\n";

const INSERT_RESPONSE: &str = "<response uri=\"/crm/private/xml/Leads/insertRecords\">\
    <result><message>Record(s) added successfully</message>\
    <recorddetail>\
    <FL val=\"Id\">177376000000142007</FL>\
    <FL val=\"Created Time\">2010-06-27 21:37:20</FL>\
    <FL val=\"Created By\">Ohtamaa</FL>\
    </recorddetail></result></response>";

async fn opened_session(server: &MockServer) -> Session {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TICKET_BODY))
        .mount(server)
        .await;

    let mut session = Session::new(Credentials::password("user@example.com", "secret"), "crmapi")
        .unwrap()
        .with_auth_url(format!("{}/login", server.uri()));
    session.open(&Crm).await.unwrap();
    session
}

#[tokio::test]
async fn insert_records_flow() {
    let server = MockServer::start().await;
    let session = opened_session(&server).await;

    Mock::given(method("POST"))
        .and(path("/crm/private/xml/Leads/insertRecords"))
        .and(body_string_contains("ticket=3bc26b16d97473a1245dbf93a5dcd153"))
        .and(body_string_contains("scope=crmapi"))
        .and(body_string_contains("xmlData=%3CLeads%3E"))
        .respond_with(ResponseTemplate::new(200).set_body_string(INSERT_RESPONSE))
        .mount(&server)
        .await;

    let client = ZohoClient::default_client().unwrap();
    let lead = Element::new("Leads").child(
        Element::new("row")
            .attr("no", 1)
            .child(Element::new("FL").attr("val", "Company").text("mFabrik"))
            .child(Element::new("FL").attr("val", "Last Name").text("Ohtamaa")),
    );

    let body = client
        .do_xml_call(
            &format!("{}/crm/private/xml/Leads/insertRecords", server.uri()),
            &Params::new(),
            &session,
            &lead,
        )
        .await
        .unwrap();

    response::check_successful_xml(&body).unwrap();
    let records = response::get_inserted_records(&body).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].get("Id").map(String::as_str),
        Some("177376000000142007")
    );
    assert_eq!(
        records[0].get("Created Time").map(String::as_str),
        Some("2010-06-27 21:37:20")
    );
}

#[tokio::test]
async fn service_error_is_raised_from_xml() {
    let server = MockServer::start().await;
    let session = opened_session(&server).await;

    Mock::given(method("POST"))
        .and(path("/crm/private/xml/Leads/insertRecords"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<response uri=\"/crm/private/xml/Leads/insertRecords\">\
             <error><code>4401</code>\
             <message>Unable to populate data, please check if mandatory value is entered correctly.</message>\
             </error></response>",
        ))
        .mount(&server)
        .await;

    let client = ZohoClient::default_client().unwrap();
    let body = client
        .do_call(
            &format!("{}/crm/private/xml/Leads/insertRecords", server.uri()),
            &Params::new(),
            &session,
        )
        .await
        .unwrap();

    let err = response::check_successful_xml(&body).unwrap_err();
    match err.kind {
        ErrorKind::Service { message } => assert!(message.contains("mandatory value")),
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[tokio::test]
async fn token_session_needs_no_handshake() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crm/private/json/Leads/getRecords"))
        .and(body_string_contains("authtoken=token789"))
        .and(body_string_contains("scope=crmapi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"response":{"result":{"Leads":{"row":[]}}}}"#,
        ))
        .mount(&server)
        .await;

    let session = Session::new(Credentials::auth_token("token789"), "crmapi").unwrap();
    session.ensure_opened().unwrap();

    let client = ZohoClient::default_client().unwrap();
    let body = client
        .do_call(
            &format!("{}/crm/private/json/Leads/getRecords", server.uri()),
            &Params::new().with("newFormat", 1),
            &session,
        )
        .await
        .unwrap();

    let data = response::decode_json(&body).unwrap();
    assert!(data["response"]["result"]["Leads"].is_object());
}

#[tokio::test]
async fn json_error_is_raised() {
    let server = MockServer::start().await;
    let session = opened_session(&server).await;

    Mock::given(method("POST"))
        .and(path("/crm/private/json/Leads/getRecords"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"response":{"uri":"/crm/private/json/Leads/getRecords","error":{"code":4500,"message":"Problem occured while processing the request"}}}"#,
        ))
        .mount(&server)
        .await;

    let client = ZohoClient::default_client().unwrap();
    let body = client
        .do_call(
            &format!("{}/crm/private/json/Leads/getRecords", server.uri()),
            &Params::new(),
            &session,
        )
        .await
        .unwrap();

    let err = response::decode_json(&body).unwrap_err();
    assert!(err.to_string().contains("4500"));
}

#[tokio::test]
async fn reopening_replaces_the_ticket() {
    let server = MockServer::start().await;
    let mut session = opened_session(&server).await;

    // A second open() re-authenticates; the mock returns the same ticket,
    // so observe the replacement through the call count.
    session.open(&Crm).await.unwrap();
    assert_eq!(session.ticket(), Some("3bc26b16d97473a1245dbf93a5dcd153"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

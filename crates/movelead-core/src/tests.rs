use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use movelead_domain::{AffiliateOffer, LeadDraft, ProxyRequest};

use crate::{
    Completion, ErrorRegion, FixedClock, LeadClient, LeadError, Operation, ProxyReply,
    ProxyTransport, TransportError, WizardController, WizardError, WizardSession, WizardStep,
    AFFILIATE_REQUIRED, CONFIRMATION_PATH, DISCLAIMER_REQUIRED,
};

#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<ProxyReply, TransportError>>>,
    sent: Mutex<Vec<ProxyRequest>>,
}

impl ScriptedTransport {
    fn replying(replies: Vec<Result<ProxyReply, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            sent: Mutex::default(),
        }
    }

    fn sent(&self) -> Vec<ProxyRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProxyTransport for ScriptedTransport {
    async fn post(&self, request: &ProxyRequest) -> Result<ProxyReply, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no scripted reply".into())))
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn controller() -> WizardController {
    WizardController::new(Arc::new(FixedClock::new(today())))
}

fn ok(body: Value) -> Result<ProxyReply, TransportError> {
    Ok(ProxyReply::new(200, body))
}

fn two_brands() -> Value {
    json!({
        "result": "success",
        "brands": [
            {
                "lp_brand_id": "brand1",
                "name": "Moving Company 1",
                "logo_url": "https://example.com/logo1.png",
                "tcpa": "TCPA disclaimer for Company 1"
            },
            {
                "lp_brand_id": "brand2",
                "name": "Moving Company 2",
                "logo_url": "https://example.com/logo2.png",
                "tcpa": "TCPA disclaimer for Company 2"
            }
        ]
    })
}

fn session(replies: Vec<Result<ProxyReply, TransportError>>) -> WizardSession<ScriptedTransport> {
    WizardSession::new(
        controller(),
        LeadClient::new(ScriptedTransport::replying(replies)),
    )
}

fn fill_quote(draft: &mut LeadDraft) {
    draft.zip_code = "12345".into();
    draft.move_to_zip_code = "67890".into();
    draft.move_to_state = "TX".into();
    draft.move_date = "2026-10-20".into();
    draft.moving_size = "2BR".into();
}

fn fill_contact(draft: &mut LeadDraft) {
    draft.first_name = "Ada".into();
    draft.last_name = "Lovelace".into();
    draft.phone_number = "(555) 123-4567".into();
    draft.email_address = "ada@example.com".into();
}

async fn session_at_review(
    replies: Vec<Result<ProxyReply, TransportError>>,
) -> WizardSession<ScriptedTransport> {
    let mut session = session(replies);
    fill_quote(session.controller_mut().draft_mut());
    fill_contact(session.controller_mut().draft_mut());
    session.request_quote().await.expect("quote");
    session.controller_mut().next().expect("to contact");
    session.controller_mut().next().expect("to review");
    assert_eq!(session.controller().step(), WizardStep::Step4Review);
    session
}

#[test]
fn invalid_step_one_never_starts_a_request() {
    let mut wizard = controller();
    wizard.draft_mut().zip_code = "abc".into();

    let err = wizard.begin_quote().expect_err("invalid draft");

    assert!(matches!(
        err,
        WizardError::Validation(ref messages) if messages[0] == "Invalid ZIP Code."
    ));
    assert_eq!(wizard.step(), WizardStep::Step1Quote);
    assert!(!wizard.is_busy());
    assert_eq!(wizard.errors().messages(ErrorRegion::Step1).len(), 5);
}

#[test]
fn same_day_move_is_accepted() {
    let mut wizard = controller();
    fill_quote(wizard.draft_mut());
    wizard.draft_mut().move_date = "2026-10-19".into();
    assert!(wizard.begin_quote().is_ok());

    let mut wizard = controller();
    fill_quote(wizard.draft_mut());
    wizard.draft_mut().move_date = "2026-10-18".into();
    assert!(wizard.begin_quote().is_err());
}

#[tokio::test]
async fn quote_with_affiliates_advances_to_step_two() {
    let mut session = session(vec![ok(two_brands())]);
    fill_quote(session.controller_mut().draft_mut());

    let completion = session.request_quote().await.expect("request starts");

    assert_eq!(completion, Completion::Advanced(WizardStep::Step2Name));
    assert_eq!(session.controller().offers().len(), 2);
    assert!(!session.controller().is_busy());

    let sent = session.client().transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].zip_code, "12345");
    assert!(sent[0].first_name.is_none());
}

#[tokio::test]
async fn quote_without_affiliates_still_advances_and_shows_placeholder() {
    let mut session = session_at_review(vec![ok(json!({"result": "success"}))]).await;

    let wizard = session.controller();
    assert!(wizard.offers().is_empty());
    assert!(wizard.affiliate_view().is_placeholder());
    assert!(wizard.draft().selected_affiliates.is_empty());

    session.controller_mut().set_disclaimer_accepted(true);
    let sent_before = session.client().transport().sent().len();
    let ticket = session.controller_mut().begin_submit();
    assert!(ticket.is_ok(), "no affiliates offered means no selection gate");
    assert_eq!(session.client().transport().sent().len(), sent_before);
}

#[tokio::test]
async fn rejected_quote_stays_on_step_one_with_upstream_messages() {
    let mut session = session(vec![ok(json!({
        "result": "failed",
        "msg": "Lead rejected",
        "reason": "Duplicate lead"
    }))]);
    fill_quote(session.controller_mut().draft_mut());

    let completion = session.request_quote().await.expect("request starts");

    assert_eq!(completion, Completion::Stayed(WizardStep::Step1Quote));
    assert_eq!(
        session.controller().current_errors(),
        ["Lead rejected".to_string(), "Duplicate lead".to_string()]
    );
}

#[tokio::test]
async fn legacy_results_marker_is_not_success() {
    let mut session = session(vec![ok(json!({"results": "success"}))]);
    fill_quote(session.controller_mut().draft_mut());

    let completion = session.request_quote().await.expect("request starts");

    assert_eq!(completion, Completion::Stayed(WizardStep::Step1Quote));
    assert_eq!(session.controller().current_errors(), ["Failed to fetch movers.".to_string()]);
}

#[tokio::test]
async fn relay_failures_map_to_step_one_messages() {
    let cases = vec![
        (
            Ok(ProxyReply::new(
                400,
                json!({"errors": [{"field": "zip_code", "message": "Invalid ZIP code."}]}),
            )),
            "Invalid ZIP code.",
        ),
        (
            Ok(ProxyReply::new(
                429,
                json!({"error": "Too many requests, please try again later."}),
            )),
            "Too many requests, please try again later.",
        ),
        (
            Ok(ProxyReply::new(
                502,
                json!({"error": "API request failed", "details": "Bad Gateway", "status": 502}),
            )),
            "Something went wrong on our side. Please try again.",
        ),
        (
            Err(TransportError::Timeout(std::time::Duration::from_secs(15))),
            "We could not reach the quote service. Check your connection and try again.",
        ),
    ];

    for (reply, expected) in cases {
        let mut session = session(vec![reply]);
        fill_quote(session.controller_mut().draft_mut());

        let completion = session.request_quote().await.expect("request starts");

        assert_eq!(completion, Completion::Stayed(WizardStep::Step1Quote));
        assert_eq!(session.controller().current_errors(), [expected.to_string()]);
        assert!(!session.controller().is_busy());
    }
}

#[tokio::test]
async fn name_and_contact_steps_gate_forward_moves() {
    let mut session = session(vec![ok(two_brands())]);
    fill_quote(session.controller_mut().draft_mut());
    session.request_quote().await.expect("quote");
    let wizard = session.controller_mut();

    wizard.draft_mut().first_name = "R2D2".into();
    assert!(matches!(wizard.next(), Err(WizardError::Validation(_))));
    assert_eq!(wizard.step(), WizardStep::Step2Name);
    assert_eq!(wizard.errors().messages(ErrorRegion::Step2).len(), 2);

    wizard.draft_mut().first_name = "Ada".into();
    wizard.draft_mut().last_name = "Lovelace".into();
    assert_eq!(wizard.next(), Ok(WizardStep::Step3Contact));
    assert!(wizard.errors().is_clear(ErrorRegion::Step2));

    wizard.draft_mut().phone_number = "555".into();
    wizard.draft_mut().email_address = "ada@example.com".into();
    assert!(matches!(wizard.next(), Err(WizardError::Validation(ref m)) if m.len() == 1));
    assert_eq!(wizard.step(), WizardStep::Step3Contact);

    wizard.draft_mut().phone_number = "555-123-4567".into();
    assert_eq!(wizard.next(), Ok(WizardStep::Step4Review));
    assert_eq!(wizard.affiliate_view().items().len(), 2);
    assert_eq!(wizard.draft().selected_affiliates, ["brand1", "brand2"]);
}

#[tokio::test]
async fn back_is_unconditional_and_keeps_values() {
    let mut session = session_at_review(vec![ok(two_brands())]).await;
    let wizard = session.controller_mut();
    wizard.draft_mut().phone_number = "not a phone".into();

    assert_eq!(wizard.back(), Ok(WizardStep::Step3Contact));
    assert_eq!(wizard.back(), Ok(WizardStep::Step2Name));
    assert_eq!(wizard.back(), Ok(WizardStep::Step1Quote));
    assert!(matches!(wizard.back(), Err(WizardError::WrongStep { .. })));
    assert_eq!(wizard.draft().first_name, "Ada");
    assert_eq!(wizard.draft().phone_number, "not a phone");
}

#[tokio::test]
async fn returning_to_review_keeps_unchecked_affiliates() {
    let mut session = session_at_review(vec![ok(two_brands())]).await;
    let wizard = session.controller_mut();
    wizard.set_affiliate_selected("brand2", false);

    wizard.back().unwrap();
    assert_eq!(wizard.next(), Ok(WizardStep::Step4Review));

    assert_eq!(wizard.draft().selected_affiliates, ["brand1"]);
    let checked: Vec<bool> = wizard
        .affiliate_view()
        .items()
        .iter()
        .map(|item| item.checked)
        .collect();
    assert_eq!(checked, [true, false]);
}

#[tokio::test]
async fn new_quote_checks_every_affiliate_again() {
    let mut session = session_at_review(vec![ok(two_brands()), ok(two_brands())]).await;
    session.controller_mut().set_affiliate_selected("brand2", false);
    for _ in 0..3 {
        session.controller_mut().back().unwrap();
    }

    session.request_quote().await.expect("second quote");
    session.controller_mut().next().unwrap();
    session.controller_mut().next().unwrap();

    assert_eq!(
        session.controller().draft().selected_affiliates,
        ["brand1", "brand2"]
    );
}

#[tokio::test]
async fn full_flow_submits_and_redirects() {
    let mut session =
        session_at_review(vec![ok(two_brands()), ok(json!({"result": "success"}))]).await;
    assert!(session.controller_mut().set_affiliate_selected("brand2", false));
    assert!(!session.controller_mut().set_affiliate_selected("brand9", true));
    session.controller_mut().set_disclaimer_accepted(true);

    let completion = session.submit().await.expect("submission starts");

    assert_eq!(completion, Completion::Redirect(CONFIRMATION_PATH));
    let sent = session.client().transport().sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].first_name.as_deref(), Some("Ada"));
    assert_eq!(sent[1].email_address.as_deref(), Some("ada@example.com"));
    assert_eq!(sent[1].selected_affiliates, ["brand1"]);
}

#[tokio::test]
async fn submit_without_disclaimer_fails_locally() {
    let mut session = session_at_review(vec![ok(two_brands())]).await;
    let sent_before = session.client().transport().sent().len();

    let err = session.submit().await.expect_err("gate rejects");

    assert_eq!(err, WizardError::Validation(vec![DISCLAIMER_REQUIRED.to_string()]));
    assert_eq!(session.client().transport().sent().len(), sent_before);
    assert_eq!(session.controller().step(), WizardStep::Step4Review);
    assert_eq!(
        session.controller().errors().messages(ErrorRegion::Step4),
        [DISCLAIMER_REQUIRED.to_string()]
    );
}

#[tokio::test]
async fn submit_lead_checks_gate_before_any_network_call() {
    let client = LeadClient::new(ScriptedTransport::default());
    let mut draft = LeadDraft::default();
    fill_quote(&mut draft);
    fill_contact(&mut draft);
    draft.selected_affiliates = vec!["brand1".into()];
    let offered = vec![AffiliateOffer::new("brand1", "Moving Company 1", "TCPA")];

    let err = client.submit_lead(&draft, &offered).await.expect_err("no consent");

    assert!(matches!(err, LeadError::Validation(ref m) if m == &[DISCLAIMER_REQUIRED.to_string()]));
    assert!(client.transport().sent().is_empty());
}

#[tokio::test]
async fn deselecting_every_offer_blocks_submission() {
    let mut session = session_at_review(vec![ok(two_brands())]).await;
    let wizard = session.controller_mut();
    wizard.set_affiliate_selected("brand1", false);
    wizard.set_affiliate_selected("brand2", false);
    wizard.set_disclaimer_accepted(true);

    let err = wizard.begin_submit().expect_err("no affiliate selected");

    assert_eq!(err, WizardError::Validation(vec![AFFILIATE_REQUIRED.to_string()]));
    assert!(!wizard.is_busy());
}

#[tokio::test]
async fn failed_submission_stays_on_review() {
    let mut session = session_at_review(vec![
        ok(two_brands()),
        Ok(ProxyReply::new(500, json!({"error": "Failed to fetch movers"}))),
    ])
    .await;
    session.controller_mut().set_disclaimer_accepted(true);

    let completion = session.submit().await.expect("submission starts");

    assert_eq!(completion, Completion::Stayed(WizardStep::Step4Review));
    assert!(!session.controller().errors().is_clear(ErrorRegion::Step4));
}

#[tokio::test]
async fn rejected_submission_stays_on_review_with_upstream_messages() {
    let mut session = session_at_review(vec![
        ok(two_brands()),
        ok(json!({"result": "failed", "msg": "Lead rejected", "reason": "Duplicate lead"})),
    ])
    .await;
    session.controller_mut().set_disclaimer_accepted(true);

    let completion = session.submit().await.expect("submission starts");

    assert_eq!(completion, Completion::Stayed(WizardStep::Step4Review));
    assert_eq!(
        session.controller().errors().messages(ErrorRegion::Step4),
        ["Lead rejected".to_string(), "Duplicate lead".to_string()]
    );
    assert!(!session.controller().is_busy());
}

#[tokio::test]
async fn submission_reply_without_success_marker_is_not_accepted() {
    for body in [json!({}), Value::Null] {
        let mut session = session_at_review(vec![ok(two_brands()), ok(body)]).await;
        session.controller_mut().set_disclaimer_accepted(true);

        let completion = session.submit().await.expect("submission starts");

        assert_eq!(completion, Completion::Stayed(WizardStep::Step4Review));
    }
}

#[test]
fn second_quote_while_in_flight_is_refused() {
    let mut wizard = controller();
    fill_quote(wizard.draft_mut());

    let ticket = wizard.begin_quote().expect("first request");
    assert_eq!(ticket.operation(), Operation::Quote);
    assert_eq!(wizard.begin_quote(), Err(WizardError::Busy(Operation::Quote)));

    let completion = wizard.complete_quote(ticket, Ok(Default::default()));
    assert_eq!(completion, Completion::Advanced(WizardStep::Step2Name));
    assert!(!wizard.is_busy());
}

#[test]
fn forward_moves_wait_for_in_flight_submission() {
    let mut wizard = controller();
    fill_quote(wizard.draft_mut());
    fill_contact(wizard.draft_mut());
    let ticket = wizard.begin_quote().unwrap();
    wizard.complete_quote(ticket, Ok(Default::default()));
    wizard.next().unwrap();
    wizard.next().unwrap();
    wizard.set_disclaimer_accepted(true);

    let submit = wizard.begin_submit().expect("submit starts");
    assert_eq!(wizard.back(), Ok(WizardStep::Step3Contact));
    assert_eq!(wizard.next(), Err(WizardError::Busy(Operation::Submit)));

    let completion = wizard.complete_submit(submit, Ok(crate::Ack { body: Value::Null }));
    assert_eq!(completion, Completion::Stale, "user left the review step");
    assert_eq!(wizard.step(), WizardStep::Step3Contact);
    assert!(!wizard.is_busy());
    assert_eq!(wizard.next(), Ok(WizardStep::Step4Review));
}

#[test]
fn response_after_restart_is_discarded() {
    let mut wizard = controller();
    fill_quote(wizard.draft_mut());
    let stale = wizard.begin_quote().expect("request starts");

    wizard.restart();
    fill_quote(wizard.draft_mut());
    let fresh = wizard.begin_quote().expect("new request starts");

    let outcome = crate::QuoteOutcome {
        affiliates: vec![AffiliateOffer::new("old", "Old", "")],
    };
    assert_eq!(wizard.complete_quote(stale, Ok(outcome)), Completion::Stale);
    assert_eq!(wizard.step(), WizardStep::Step1Quote);
    assert!(wizard.offers().is_empty());
    assert!(wizard.is_busy(), "the fresh request is still pending");

    assert_eq!(
        wizard.complete_quote(fresh, Ok(Default::default())),
        Completion::Advanced(WizardStep::Step2Name)
    );
}

#[test]
fn new_quote_replaces_offers() {
    let mut wizard = controller();
    fill_quote(wizard.draft_mut());
    let first = wizard.begin_quote().unwrap();
    wizard.complete_quote(
        first,
        Ok(crate::QuoteOutcome {
            affiliates: vec![
                AffiliateOffer::new("a", "A", ""),
                AffiliateOffer::new("b", "B", ""),
            ],
        }),
    );
    wizard.back().unwrap();

    let second = wizard.begin_quote().unwrap();
    wizard.complete_quote(
        second,
        Ok(crate::QuoteOutcome {
            affiliates: vec![AffiliateOffer::new("c", "C", "")],
        }),
    );

    let ids: Vec<&str> = wizard.offers().iter().map(|offer| offer.id.as_str()).collect();
    assert_eq!(ids, ["c"]);
}

use std::sync::Arc;
use std::time::Duration;

use docfinder_core::Doctor;
use docfinder_notifications::{ChannelQueue, NotificationReceiver};
use docfinder_server::{AppConfig, AppState, build_app};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

async fn start_server() -> (
    String,
    NotificationReceiver,
    tokio::sync::oneshot::Sender<()>,
    JoinHandle<()>,
) {
    let cfg = AppConfig::default();
    let (queue, receiver) = ChannelQueue::new();
    let state = AppState::in_memory(&cfg)
        .expect("state")
        .with_notifications(Arc::new(queue));

    state
        .store
        .create_doctor(Doctor {
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            specialization: "Cardiology".into(),
            phone: "5125550100".into(),
            email: "jane@example.com".into(),
            address: "1 Main St".into(),
            ..Doctor::new("1003000126")
        })
        .await
        .expect("seed doctor");

    let app = build_app(state, &cfg);
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), receiver, tx, server)
}

fn booking(time: &str) -> Value {
    json!({
        "doctor": "1003000126",
        "patient_name": "Ada Lovelace",
        "phone_number": "+11234567890",
        "email": "ada@example.com",
        "reason": "Checkup",
        "appointment_date": "2025-03-10",
        "appointment_time": time,
    })
}

#[tokio::test]
async fn booking_creates_appointment_and_enqueues_confirmation() {
    let (base, mut receiver, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/appointments/create/"))
        .json(&booking("09:30"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["doctor"], "1003000126");
    assert_eq!(body["doctor_name"], "Jane");
    assert_eq!(body["appointment_date"], "2025-03-10");
    assert_eq!(body["appointment_time"], "09:30:00");
    let appointment_id = body["appointment_id"].as_str().unwrap().to_string();

    let job = tokio::time::timeout(Duration::from_secs(5), receiver.recv())
        .await
        .expect("confirmation enqueued")
        .unwrap();
    assert_eq!(job.recipient.email.as_deref(), Some("ada@example.com"));
    assert_eq!(job.template_data["doctor_name"], "Jane Smith");
    assert_eq!(job.template_data["appointment_id"], appointment_id);

    // Same slot again, written with seconds
    let resp = client
        .post(format!("{base}/api/appointments/create/"))
        .json(&booking("09:30:00"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["non_field_errors"][0],
        "The fields doctor, appointment_date, appointment_time must make a unique set."
    );

    let resp = client
        .get(format!("{base}/api/admin/appointments/?doctor=1003000126"))
        .send()
        .await
        .unwrap();
    let listed: Value = resp.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn booking_reports_every_field_error() {
    let (base, _receiver, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/appointments/create/"))
        .json(&json!({
            "doctor": "missing",
            "patient_name": "",
            "phone_number": "1234567890",
            "email": "not-an-email",
            "appointment_date": "10/03/2025",
            "appointment_time": "9.30",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["phone_number"][0],
        "Phone number must be in international format like +11234567890."
    );
    assert_eq!(body["doctor"][0], "Invalid pk \"missing\" - object does not exist.");
    assert_eq!(body["reason"][0], "This field is required.");
    assert_eq!(body["patient_name"][0], "This field may not be blank.");
    assert_eq!(body["email"][0], "Enter a valid email address.");
    assert!(body.get("appointment_date").is_some());
    assert!(body.get("appointment_time").is_some());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (base, _receiver, shutdown_tx, handle) = start_server().await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/appointments/create/"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

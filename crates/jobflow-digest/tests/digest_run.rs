//! Digest selection and delivery against an in-memory store and mailer.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use jobflow_core::{JobId, JobSource, StoredJob, Subscriber};
use jobflow_digest::{
    build_digest, run_daily_digest, Digest, DigestRenderer, DigestStore, MailError, Mailer,
};
use jobflow_store::StoreError;
use uuid::Uuid;

// -----------------------------------------------------------------------
// fakes
// -----------------------------------------------------------------------

#[derive(Default)]
struct MemoryStore {
    subscribers: Vec<Subscriber>,
    preferences: HashMap<Uuid, BTreeSet<String>>,
    /// Newest first.
    jobs: Vec<StoredJob>,
    logs: Mutex<Vec<(Uuid, JobId)>>,
    fail_preferences_for: Option<Uuid>,
}

impl MemoryStore {
    fn logged_for(&self, user_id: Uuid) -> Vec<JobId> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, j)| j.clone())
            .collect()
    }
}

#[async_trait]
impl DigestStore for MemoryStore {
    async fn subscribers(&self) -> Result<Vec<Subscriber>, StoreError> {
        Ok(self.subscribers.clone())
    }

    async fn title_preferences(&self, user_id: Uuid) -> Result<BTreeSet<String>, StoreError> {
        if self.fail_preferences_for == Some(user_id) {
            return Err(StoreError::Api {
                status: 503,
                context: "job titles".to_string(),
                body: "unavailable".to_string(),
            });
        }
        Ok(self.preferences.get(&user_id).cloned().unwrap_or_default())
    }

    async fn sent_job_ids(&self, user_id: Uuid) -> Result<HashSet<JobId>, StoreError> {
        Ok(self.logged_for(user_id).into_iter().collect())
    }

    async fn recent_matching_jobs(
        &self,
        titles: &[String],
        limit: u32,
    ) -> Result<Vec<StoredJob>, StoreError> {
        Ok(self
            .jobs
            .iter()
            .filter(|j| {
                j.search_title
                    .as_ref()
                    .is_some_and(|t| titles.contains(t))
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn record_delivery(&self, user_id: Uuid, job_id: &JobId) {
        self.logs.lock().unwrap().push((user_id, job_id.clone()));
    }
}

#[derive(Default)]
struct MemoryMailer {
    sent: Mutex<Vec<(String, String, String)>>,
    reject: bool,
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        if self.reject {
            return Err(MailError::Rejected {
                status: 422,
                body: "invalid recipient".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), html.to_string()));
        Ok(())
    }
}

// -----------------------------------------------------------------------
// fixtures
// -----------------------------------------------------------------------

fn subscriber(email: &str) -> Subscriber {
    Subscriber {
        id: Uuid::new_v4(),
        email: email.to_string(),
        unsubscribe_token: format!("tok-{email}"),
        is_subscribed: true,
    }
}

fn job(id: &str, search_title: &str) -> StoredJob {
    StoredJob {
        id: JobId::new(id),
        external_id: Some(format!("linkedin_{id}")),
        source: JobSource::Linkedin,
        title: Some(format!("{search_title} {id}")),
        company: Some("Acme".to_string()),
        location: Some("Remote".to_string()),
        url: Some(format!("https://jobs.example.com/{id}")),
        salary: None,
        search_title: Some(search_title.to_string()),
        scraped_at: None,
    }
}

fn prefs(titles: &[&str]) -> BTreeSet<String> {
    titles.iter().map(|t| (*t).to_string()).collect()
}

fn renderer() -> DigestRenderer {
    DigestRenderer::new("https://jobflow.test").expect("templates should parse")
}

// -----------------------------------------------------------------------
// builder
// -----------------------------------------------------------------------

#[tokio::test]
async fn previously_sent_jobs_are_excluded() {
    let sub = subscriber("a@example.com");
    let store = MemoryStore {
        preferences: HashMap::from([(sub.id, prefs(&["Data Engineer"]))]),
        jobs: vec![
            job("J3", "Data Engineer"),
            job("J2", "Data Engineer"),
            job("J1", "Data Engineer"),
        ],
        logs: Mutex::new(vec![(sub.id, JobId::new("J1")), (sub.id, JobId::new("J2"))]),
        ..MemoryStore::default()
    };

    let digest = build_digest(&store, &sub, 20).await.unwrap();

    match digest {
        Digest::Jobs(jobs) => {
            let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
            assert_eq!(ids, vec!["J3"]);
        }
        Digest::NoPreferences => panic!("expected jobs"),
    }
}

#[tokio::test]
async fn another_subscribers_log_does_not_filter() {
    let a = subscriber("a@example.com");
    let b = subscriber("b@example.com");
    let store = MemoryStore {
        preferences: HashMap::from([(b.id, prefs(&["Nurse"]))]),
        jobs: vec![job("N1", "Nurse")],
        logs: Mutex::new(vec![(a.id, JobId::new("N1"))]),
        ..MemoryStore::default()
    };

    let digest = build_digest(&store, &b, 20).await.unwrap();
    assert!(matches!(digest, Digest::Jobs(jobs) if jobs.len() == 1));
}

#[tokio::test]
async fn recency_order_is_preserved_and_limit_applied() {
    let sub = subscriber("a@example.com");
    let store = MemoryStore {
        preferences: HashMap::from([(sub.id, prefs(&["Welder", "Nurse"]))]),
        jobs: vec![
            job("W3", "Welder"),
            job("N2", "Nurse"),
            job("X9", "Chef"),
            job("W1", "Welder"),
        ],
        ..MemoryStore::default()
    };

    let Digest::Jobs(jobs) = build_digest(&store, &sub, 2).await.unwrap() else {
        panic!("expected jobs");
    };
    let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["W3", "N2"]);
}

#[tokio::test]
async fn no_preferences_means_no_digest() {
    let sub = subscriber("a@example.com");
    let store = MemoryStore {
        jobs: vec![job("J1", "Data Engineer")],
        ..MemoryStore::default()
    };

    assert_eq!(
        build_digest(&store, &sub, 20).await.unwrap(),
        Digest::NoPreferences
    );
}

// -----------------------------------------------------------------------
// full run
// -----------------------------------------------------------------------

#[tokio::test]
async fn subscriber_without_preferences_gets_no_email() {
    let sub = subscriber("idle@example.com");
    let store = MemoryStore {
        subscribers: vec![sub],
        jobs: vec![job("J1", "Data Engineer")],
        ..MemoryStore::default()
    };
    let mailer = MemoryMailer::default();

    let summary = run_daily_digest(&store, &mailer, &renderer(), 20).await;

    assert_eq!(summary.skipped_no_preferences, 1);
    assert_eq!(summary.sent_with_jobs + summary.sent_empty, 0);
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn second_run_sends_no_jobs_email_without_receipts() {
    let sub = subscriber("a@example.com");
    let id = sub.id;
    let store = MemoryStore {
        subscribers: vec![sub],
        preferences: HashMap::from([(id, prefs(&["Data Engineer"]))]),
        jobs: vec![
            job("J3", "Data Engineer"),
            job("J2", "Data Engineer"),
            job("J1", "Data Engineer"),
        ],
        ..MemoryStore::default()
    };
    let mailer = MemoryMailer::default();
    let renderer = renderer();

    let first = run_daily_digest(&store, &mailer, &renderer, 20).await;
    assert_eq!(first.sent_with_jobs, 1);
    assert_eq!(first.jobs_sent, 3);
    assert_eq!(store.logged_for(id).len(), 3);
    {
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "a@example.com");
        assert_eq!(sent[0].1, "🎯 3 new jobs for you - JobFlow");
    }

    let second = run_daily_digest(&store, &mailer, &renderer, 20).await;
    assert_eq!(second.sent_with_jobs, 0);
    assert_eq!(second.sent_empty, 1);
    assert_eq!(store.logged_for(id).len(), 3);

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].1, "📭 No new jobs today - JobFlow");
    assert!(sent[1].2.contains("No New Jobs Today"));
}

#[tokio::test]
async fn failed_send_writes_no_receipts() {
    let sub = subscriber("bounce@example.com");
    let id = sub.id;
    let store = MemoryStore {
        subscribers: vec![sub],
        preferences: HashMap::from([(id, prefs(&["Data Engineer"]))]),
        jobs: vec![job("J1", "Data Engineer")],
        ..MemoryStore::default()
    };
    let mailer = MemoryMailer {
        reject: true,
        ..MemoryMailer::default()
    };

    let summary = run_daily_digest(&store, &mailer, &renderer(), 20).await;

    assert!(store.logged_for(id).is_empty());
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].email, "bounce@example.com");
    assert!(summary.errors[0].reason.contains("422"));
}

#[tokio::test]
async fn one_subscribers_failure_does_not_stop_the_rest() {
    let broken = subscriber("broken@example.com");
    let fine = subscriber("fine@example.com");
    let store = MemoryStore {
        subscribers: vec![broken.clone(), fine.clone()],
        preferences: HashMap::from([
            (broken.id, prefs(&["Nurse"])),
            (fine.id, prefs(&["Nurse"])),
        ]),
        jobs: vec![job("N1", "Nurse")],
        fail_preferences_for: Some(broken.id),
        ..MemoryStore::default()
    };
    let mailer = MemoryMailer::default();

    let summary = run_daily_digest(&store, &mailer, &renderer(), 20).await;

    assert_eq!(summary.subscribers, 2);
    assert_eq!(summary.sent_with_jobs, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].email, "broken@example.com");
    assert_eq!(store.logged_for(fine.id), vec![JobId::new("N1")]);
}

//! Notifier fan-out, coalescing and subscription cleanup.

use cribbage_league_web::Notifier;
use std::time::Duration;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(1);

#[tokio::test]
async fn every_waiting_subscriber_is_woken() {
    let notifier = Notifier::new();
    let mut a = notifier.subscribe();
    let mut b = notifier.subscribe();
    assert_eq!(notifier.subscriber_count(), 2);
    assert_ne!(a.id(), b.id());

    let wait_a = tokio::spawn(async move {
        let got = timeout(WAIT, a.recv()).await;
        (a, got)
    });
    let wait_b = tokio::spawn(async move {
        let got = timeout(WAIT, b.recv()).await;
        (b, got)
    });
    tokio::task::yield_now().await;
    notifier.notify();

    let (a, got_a) = wait_a.await.unwrap();
    let (b, got_b) = wait_b.await.unwrap();
    assert_eq!(got_a, Ok(Some(())));
    assert_eq!(got_b, Ok(Some(())));

    a.unsubscribe().await;
    b.unsubscribe().await;
    assert_eq!(notifier.subscriber_count(), 0);

    // Nobody left to tell.
    notifier.notify();
}

#[tokio::test]
async fn fast_receiver_gets_one_signal_per_notify() {
    let notifier = Notifier::new();
    let mut sub = notifier.subscribe();

    for _ in 0..20 {
        notifier.notify();
        timeout(WAIT, sub.recv())
            .await
            .expect("signal lost")
            .unwrap();
    }
    assert!(timeout(Duration::from_millis(50), sub.recv()).await.is_err());
}

#[tokio::test]
async fn bursts_coalesce_without_blocking() {
    let notifier = Notifier::new();
    let mut sub = notifier.subscribe();

    for _ in 0..100 {
        notifier.notify();
    }
    // Let every offer run while the reader is busy elsewhere.
    tokio::time::sleep(Duration::from_millis(50)).await;

    timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert!(timeout(Duration::from_millis(50), sub.recv()).await.is_err());

    // The next change after the reader caught up still gets through.
    notifier.notify();
    timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    sub.unsubscribe().await;
    assert_eq!(notifier.subscriber_count(), 0);
}

#[tokio::test]
async fn resubscribing_receiver_keeps_up() {
    let notifier = Notifier::new();
    let mut received = 0;
    for _ in 0..10 {
        let mut sub = notifier.subscribe();
        notifier.notify();
        if timeout(WAIT, sub.recv()).await.unwrap().is_some() {
            received += 1;
        }
        sub.unsubscribe().await;
    }
    assert_eq!(received, 10);
    assert_eq!(notifier.subscriber_count(), 0);
}

#[tokio::test]
async fn dropping_a_subscription_unregisters_it() {
    let notifier = Notifier::new();
    let kept = notifier.subscribe();
    {
        let _gone = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 2);
    }
    assert_eq!(notifier.subscriber_count(), 1);
    notifier.notify();
    drop(kept);
    assert_eq!(notifier.subscriber_count(), 0);
}

#[tokio::test]
async fn unsubscribe_with_pending_signals_returns() {
    let notifier = Notifier::new();
    let sub = notifier.subscribe();
    for _ in 0..10 {
        notifier.notify();
    }
    // The reader never drains its channel; unsubscribing must still finish.
    timeout(WAIT, sub.unsubscribe())
        .await
        .expect("unsubscribe hung on in-flight sends");
    notifier.notify();
}

#[tokio::test]
async fn clones_share_subscribers() {
    let notifier = Notifier::new();
    let writer = notifier.clone();
    let mut sub = notifier.subscribe();
    writer.notify();
    timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert_eq!(writer.subscriber_count(), 1);
}

#[test]
fn notify_without_runtime_still_delivers() {
    let notifier = Notifier::new();
    let mut sub = notifier.subscribe();
    notifier.notify();
    notifier.notify();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    rt.block_on(async {
        timeout(WAIT, sub.recv()).await.unwrap().unwrap();
        assert!(timeout(Duration::from_millis(20), sub.recv()).await.is_err());
    });
}

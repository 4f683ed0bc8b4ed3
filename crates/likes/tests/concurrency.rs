use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Barrier;

use fanpage_likes::{
    ActorId, AdmissionMode, DuplicateLikePolicy, InMemoryCounterStore, LikeCoordinator,
    LikeError, LikesConfig, ManualClock, TargetId,
};

fn setup(config: LikesConfig) -> (LikeCoordinator, InMemoryCounterStore) {
    let store = InMemoryCounterStore::new();
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let coordinator = LikeCoordinator::with_clock(config, Arc::new(store.clone()), clock).unwrap();
    (coordinator, store)
}

async fn race<F, Fut, T>(tasks: usize, f: F) -> Vec<T>
where
    F: Fn(usize) -> Fut,
    Fut: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let barrier = Arc::new(Barrier::new(tasks));
    let mut handles = Vec::with_capacity(tasks);
    for i in 0..tasks {
        let barrier = barrier.clone();
        let fut = f(i);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            fut.await
        }));
    }
    let mut out = Vec::with_capacity(tasks);
    for h in handles {
        out.push(h.await.unwrap());
    }
    out
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_unlikes_have_one_winner() {
    let (c, store) = setup(LikesConfig::default());
    let t = TargetId::from("post-T");
    let a = ActorId::from("actor-A");
    c.like(&t, &a).await.unwrap();

    let results = race(16, |_| {
        let c = c.clone();
        let (t, a) = (t.clone(), a.clone());
        async move { c.unlike(&t, &a).await }
    })
    .await;

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    assert!(results.iter().all(|r| matches!(
        r,
        Ok(()) | Err(LikeError::UnlikeRaceLost) | Err(LikeError::NothingToUnlike)
    )));
    assert_eq!(store.count(&t), 0);
    assert!(!c.has_active_like(&t, &a));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn atomic_admission_never_exceeds_cap() {
    let (c, store) = setup(LikesConfig::default());
    let a = ActorId::from("actor-A");

    let results = race(32, |i| {
        let c = c.clone();
        let a = a.clone();
        async move { c.like(&TargetId::new(format!("post-{i}")), &a).await }
    })
    .await;

    let admitted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(admitted, 3);
    assert_eq!(c.actor_stats(&a).recent_likes, 3);
    assert_eq!(c.metrics().likes_rate_limited_val(), 29);
    let stored: u64 = (0..32)
        .map(|i| store.count(&TargetId::new(format!("post-{i}"))))
        .sum();
    assert_eq!(stored, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn check_then_record_over_admission_is_bounded() {
    let config = LikesConfig {
        admission: AdmissionMode::CheckThenRecord,
        ..LikesConfig::default()
    };
    let (c, _) = setup(config);
    let a = ActorId::from("actor-A");
    let tasks = 32;

    let results = race(tasks, |i| {
        let c = c.clone();
        let a = a.clone();
        async move { c.like(&TargetId::new(format!("post-{i}")), &a).await }
    })
    .await;

    // two critical sections: at least the cap, at most cap + (in-flight - 1)
    let admitted = results.iter().filter(|r| r.is_ok()).count();
    assert!(admitted >= 3);
    assert!(admitted <= 3 + tasks - 1);
    assert_eq!(c.actor_stats(&a).recent_likes, admitted);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn reject_policy_keeps_single_active_like_under_contention() {
    let config = LikesConfig {
        rate_cap: 100,
        duplicate_likes: DuplicateLikePolicy::Reject,
        ..LikesConfig::default()
    };
    let (c, store) = setup(config);
    let t = TargetId::from("post-T");
    let a = ActorId::from("actor-A");

    let results = race(16, |_| {
        let c = c.clone();
        let (t, a) = (t.clone(), a.clone());
        async move { c.like(&t, &a).await }
    })
    .await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .all(|r| matches!(r, Ok(_) | Err(LikeError::AlreadyLiked))));
    assert_eq!(c.count(&t), 1);
    assert_eq!(store.count(&t), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn count_matches_liked_actors_at_quiescence() {
    let config = LikesConfig {
        rate_cap: 1_000,
        duplicate_likes: DuplicateLikePolicy::Reject,
        ..LikesConfig::default()
    };
    let (c, store) = setup(config);
    let targets: Vec<TargetId> = (0..4).map(|i| TargetId::new(format!("post-{i}"))).collect();
    let actors: Vec<ActorId> = (0..24).map(|i| ActorId::new(format!("actor-{i}"))).collect();

    let sweeping = {
        let c = c.clone();
        tokio::spawn(async move {
            for _ in 0..50 {
                c.sweep();
                tokio::task::yield_now().await;
            }
        })
    };

    let mut handles = Vec::new();
    for i in 0..24 {
        let c = c.clone();
        let targets = targets.clone();
        // one task per actor keeps each actor's store calls ordered
        let actor = actors[i].clone();
        handles.push(tokio::spawn(async move {
            for round in 0..20 {
                let t = &targets[(i + round) % targets.len()];
                if (i + round) % 3 == 0 {
                    let _ = c.unlike(t, &actor).await;
                } else {
                    let _ = c.like(t, &actor).await;
                }
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }
    sweeping.await.unwrap();

    for t in &targets {
        let liked = actors.iter().filter(|a| c.has_active_like(t, a)).count();
        assert_eq!(c.count(t), liked);
        assert_eq!(c.liked_actors(t).len(), liked);
        assert_eq!(store.count(t), liked as u64);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sweeper_runs_alongside_requests() {
    let (c, _) = setup(LikesConfig {
        sweep_interval_seconds: 1,
        ..LikesConfig::default()
    });
    let token = tokio_util::sync::CancellationToken::new();
    let handle = c.sweeper().spawn(token.clone());

    let t = TargetId::from("post-T");
    for i in 0..10 {
        c.like(&t, &ActorId::new(format!("actor-{i}"))).await.unwrap();
    }
    assert_eq!(c.count(&t), 10);

    tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
        .await
        .expect("sweeper did not shut down");
}

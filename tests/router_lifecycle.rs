mod common;

use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::time::Duration;

use common::{harness, CountingSlot, HookJournal, RecordingSurfaces, ROUTES};
use ship_status::audio::{AudioSink, Cue};
use ship_status::router::{
    LocationSlot, Navigation, NavigationError, RouteDescriptor, Router, SurfacePhase,
};

async fn offline_sensor() -> anyhow::Result<()> {
    anyhow::bail!("sensor offline")
}

async fn exploding_hook() -> anyhow::Result<()> {
    panic!("exit hook exploded")
}

#[tokio::test]
async fn test_start_opens_default_route() {
    let h = harness(None);
    let outcome = h.router.start().await.unwrap();

    assert_eq!(outcome.route(), "dashboard");
    assert_eq!(h.router.current_route().as_deref(), Some("dashboard"));
    assert_eq!(h.slot.token().as_deref(), Some("dashboard"));
    assert_eq!(h.journal.entries(), vec!["enter:dashboard"]);
}

#[tokio::test]
async fn test_start_twice_is_rejected() {
    let h = harness(None);
    h.router.start().await.unwrap();
    assert_eq!(h.router.start().await, Err(NavigationError::AlreadyStarted));
}

#[tokio::test]
async fn test_navigating_to_current_route_is_a_no_op() {
    let h = harness(None);
    h.router.start().await.unwrap();
    let writes = h.slot.writes();
    let phases = h.surfaces.log().len();

    let outcome = h.router.navigate("dashboard", true).await.unwrap();

    assert_eq!(outcome, Navigation::Unchanged("dashboard".to_string()));
    assert_eq!(h.journal.count("enter:dashboard"), 1);
    assert_eq!(h.journal.count("exit:dashboard"), 0);
    assert_eq!(h.slot.writes(), writes);
    assert_eq!(h.surfaces.log().len(), phases);
}

#[tokio::test]
async fn test_lifecycle_runs_exit_then_enter() {
    let h = harness(None);
    h.router.start().await.unwrap();
    h.journal.clear();

    let outcome = h.router.navigate("engineering", false).await.unwrap();

    assert!(outcome.is_change());
    assert_eq!(h.journal.entries(), vec!["exit:dashboard", "enter:engineering"]);
    assert_eq!(h.router.current_route().as_deref(), Some("engineering"));
    assert_eq!(h.slot.token().as_deref(), Some("engineering"));
    assert_eq!(h.surfaces.visible(), vec!["engineering-surface"]);
}

#[tokio::test]
async fn test_only_one_surface_active_after_many_navigations() {
    let h = harness(None);
    h.router.start().await.unwrap();

    for id in ["crew", "navigation", "crew", "life-support", "dashboard"] {
        h.router.navigate(id, false).await.unwrap();
        let expected = format!("{}-surface", id);
        assert_eq!(h.surfaces.visible(), vec![expected]);
    }
}

#[tokio::test]
async fn test_overlapping_navigation_is_rejected() {
    let surfaces = RecordingSurfaces::with(ROUTES);
    let slot = CountingSlot::new(None);
    let journal = HookJournal::default();
    let router = common::console_builder(surfaces, slot, &journal)
        .route(journal.slow_route("crew", Duration::from_millis(50)))
        .build();
    router.start().await.unwrap();

    let (first, second) = tokio::join!(
        router.navigate("crew", false),
        router.navigate("engineering", false)
    );

    assert!(first.unwrap().is_change());
    assert_eq!(second, Err(NavigationError::Busy));
    assert_eq!(router.current_route().as_deref(), Some("crew"));
    assert_eq!(journal.count("enter:engineering"), 0);

    // Lock released once the first navigation finished
    assert!(router.navigate("engineering", false).await.unwrap().is_change());
}

#[tokio::test]
async fn test_busy_rejection_leaves_state_untouched() {
    let surfaces = RecordingSurfaces::with(ROUTES);
    let slot = CountingSlot::new(None);
    let journal = HookJournal::default();
    let router = common::console_builder(surfaces, slot.clone(), &journal)
        .route(journal.slow_route("crew", Duration::from_millis(30)))
        .build();
    router.start().await.unwrap();

    let task = {
        let router = router.clone();
        tokio::spawn(async move { router.navigate("crew", false).await })
    };
    while !router.is_transitioning() {
        tokio::task::yield_now().await;
    }

    let writes = slot.writes();
    assert_eq!(router.navigate("navigation", true).await, Err(NavigationError::Busy));
    assert!(router.handle_hotkey("F2").await);
    assert_eq!(slot.writes(), writes);

    task.await.unwrap().unwrap();
    assert_eq!(router.current_route().as_deref(), Some("crew"));
    assert!(!router.is_transitioning());
}

#[tokio::test]
async fn test_unknown_route_falls_back_to_default() {
    let h = harness(None);
    h.router.start().await.unwrap();
    h.router.navigate("crew", false).await.unwrap();

    let outcome = h.router.navigate("warp-core", false).await.unwrap();

    assert_eq!(outcome.route(), "dashboard");
    assert_eq!(h.slot.token().as_deref(), Some("dashboard"));
}

#[tokio::test]
async fn test_unknown_token_on_default_route_is_rewritten() {
    let h = harness(None);
    h.router.start().await.unwrap();

    h.slot.write("warp-core");
    let outcome = h
        .router
        .handle_location_change(h.slot.token().as_deref())
        .await
        .unwrap();

    assert_eq!(outcome, Navigation::Unchanged("dashboard".to_string()));
    assert_eq!(h.slot.token().as_deref(), Some("dashboard"));
    assert_eq!(h.journal.count("enter:dashboard"), 1);
}

#[tokio::test]
async fn test_unknown_route_without_default_fails() {
    let surfaces = RecordingSurfaces::with(ROUTES);
    let journal = HookJournal::default();
    let router = common::console_builder(surfaces, CountingSlot::new(None), &journal)
        .default_route("bridge")
        .build();

    assert_eq!(
        router.navigate("warp-core", false).await,
        Err(NavigationError::UnknownRoute("warp-core".to_string()))
    );
    assert!(!router.is_transitioning());
    assert_eq!(router.current_route(), None);
}

#[tokio::test]
async fn test_hotkeys_dispatch_first_match() {
    let h = harness(None);
    h.router.start().await.unwrap();

    assert!(h.router.handle_hotkey("F4").await);
    assert_eq!(h.router.current_route().as_deref(), Some("engineering"));

    assert!(!h.router.handle_hotkey("F9").await);
    assert_eq!(h.router.current_route().as_deref(), Some("engineering"));
}

#[tokio::test]
async fn test_duplicate_hotkey_prefers_first_registration() {
    let surfaces = RecordingSurfaces::with(&["dashboard", "crew", "navigation"]);
    let journal = HookJournal::default();
    let router = Router::builder(surfaces)
        .location(CountingSlot::new(None))
        .transition(Duration::ZERO)
        .route(journal.route("dashboard"))
        .route(journal.route("crew").hotkey("c"))
        .route(journal.route("navigation").hotkey("c"))
        .build();
    router.start().await.unwrap();

    assert_eq!(router.hotkey_target("c").as_deref(), Some("crew"));
    assert!(router.handle_hotkey("c").await);
    assert_eq!(router.current_route().as_deref(), Some("crew"));
}

#[tokio::test]
async fn test_failing_enter_hook_still_releases_lock() {
    let h = harness(None);
    h.router
        .register_route(RouteDescriptor::new("crew", "Crew").on_enter(offline_sensor));
    h.router.start().await.unwrap();

    let outcome = h.router.navigate("crew", false).await.unwrap();
    assert!(outcome.is_change());
    assert!(!h.router.is_transitioning());
    assert_eq!(h.router.current_route().as_deref(), Some("crew"));

    assert!(h.router.navigate("dashboard", false).await.unwrap().is_change());
}

#[tokio::test]
async fn test_failing_exit_hook_does_not_block_navigation() {
    let h = harness(None);
    h.router.register_route(
        RouteDescriptor::new("crew", "Crew")
            .hotkey("F5")
            .on_exit(offline_sensor),
    );
    h.router.start().await.unwrap();
    h.router.navigate("crew", false).await.unwrap();

    let outcome = h.router.navigate("navigation", false).await.unwrap();
    assert_eq!(outcome.route(), "navigation");
    assert!(!h.router.is_transitioning());
    assert_eq!(h.journal.count("enter:navigation"), 1);
    assert_eq!(h.surfaces.visible(), vec!["navigation-surface"]);
    assert_eq!(h.slot.token().as_deref(), Some("navigation"));
}

#[tokio::test]
async fn test_panicking_hook_still_releases_lock() {
    let h = harness(None);
    h.router
        .register_route(RouteDescriptor::new("crew", "Crew").on_exit(exploding_hook));
    h.router.start().await.unwrap();
    h.router.navigate("crew", false).await.unwrap();

    let outcome = h.router.navigate("navigation", false).await.unwrap();
    assert_eq!(outcome.route(), "navigation");
    assert!(!h.router.is_transitioning());
    assert_eq!(h.journal.count("enter:navigation"), 1);
}

#[tokio::test]
async fn test_missing_surface_aborts_navigation() {
    let h = harness(None);
    h.router
        .register_route(h.journal.route("sensors").surface("sensors-panel"));
    h.router.start().await.unwrap();
    h.journal.clear();

    let result = h.router.navigate("sensors", false).await;

    assert_eq!(
        result,
        Err(NavigationError::MissingSurface {
            route: "sensors".to_string(),
            surface: "sensors-panel".to_string(),
        })
    );
    assert!(!h.router.is_transitioning());
    assert_eq!(h.router.current_route().as_deref(), Some("dashboard"));
    assert_eq!(h.slot.token().as_deref(), Some("dashboard"));
    assert!(h.journal.entries().is_empty());
    assert_eq!(h.surfaces.visible(), vec!["dashboard-surface"]);
}

#[tokio::test]
async fn test_subscribers_receive_changes() {
    let h = harness(None);
    let mut changes = h.router.subscribe();
    h.router.start().await.unwrap();
    h.router.navigate("crew", false).await.unwrap();
    h.router.navigate("crew", false).await.unwrap();

    let first = changes.recv().await.unwrap();
    assert_eq!(first.current, "dashboard");
    assert_eq!(first.previous, None);

    let second = changes.recv().await.unwrap();
    assert_eq!(second.current, "crew");
    assert_eq!(second.previous.as_deref(), Some("dashboard"));

    // The no-op navigation is not announced
    assert!(changes.try_recv().is_err());
}

#[tokio::test]
async fn test_animated_swap_fades_out_then_in() {
    let surfaces = RecordingSurfaces::with(ROUTES);
    let journal = HookJournal::default();
    let router = common::console_builder(surfaces.clone(), CountingSlot::new(None), &journal)
        .transition(Duration::from_millis(20))
        .build();
    router.start().await.unwrap();
    let before = surfaces.log().len();

    router.navigate("crew", true).await.unwrap();

    let swap: Vec<_> = surfaces.log().into_iter().skip(before).collect();
    assert_eq!(
        swap,
        vec![
            ("dashboard-surface".to_string(), SurfacePhase::FadingOut),
            ("dashboard-surface".to_string(), SurfacePhase::Hidden),
            ("crew-surface".to_string(), SurfacePhase::FadingIn),
            ("crew-surface".to_string(), SurfacePhase::Active),
        ]
    );
}

#[tokio::test]
async fn test_unanimated_swap_is_immediate() {
    let surfaces = RecordingSurfaces::with(ROUTES);
    let journal = HookJournal::default();
    let router = common::console_builder(surfaces.clone(), CountingSlot::new(None), &journal)
        .transition(Duration::from_secs(30))
        .build();

    // Would hang for 30s if the fade phases were awaited
    tokio::time::timeout(Duration::from_secs(1), async {
        router.start().await.unwrap();
        router.navigate("crew", false).await.unwrap();
    })
    .await
    .unwrap();

    assert!(surfaces.log().iter().all(|(_, phase)| !phase.is_fading()));
}

#[tokio::test]
async fn test_registration_is_last_write_wins() {
    let h = harness(None);
    let replaced = h
        .router
        .register_route(RouteDescriptor::new("crew", "Crew Roster").hotkey("F5"));

    assert!(replaced.is_some());
    assert_eq!(h.router.route_ids().len(), ROUTES.len());
    assert_eq!(h.router.descriptor("crew").unwrap().title, "Crew Roster");
    // Position in the hotkey order is kept
    assert_eq!(h.router.route_ids()[4], "crew");
}

#[tokio::test]
async fn test_router_is_shareable_across_tasks() {
    let h = harness(None);
    h.router.start().await.unwrap();

    let router: Arc<Router> = h.router.clone();
    let handle = tokio::spawn(async move { router.navigate("life-support", false).await });
    handle.await.unwrap().unwrap();

    assert_eq!(h.router.current_route().as_deref(), Some("life-support"));
}

#[tokio::test]
async fn test_dropped_navigation_releases_lock() {
    let surfaces = RecordingSurfaces::with(ROUTES);
    let journal = HookJournal::default();
    let router = common::console_builder(surfaces, CountingSlot::new(None), &journal)
        .route(journal.slow_route("crew", Duration::from_secs(60)))
        .build();
    router.start().await.unwrap();

    let cancelled = tokio::time::timeout(Duration::from_millis(20), router.navigate("crew", false)).await;
    assert!(cancelled.is_err());
    assert!(!router.is_transitioning());

    let outcome = router.navigate("engineering", false).await.unwrap();
    assert!(outcome.is_change());
    assert_eq!(router.current_route().as_deref(), Some("engineering"));
}

#[tokio::test]
async fn test_reregistering_live_route_hides_the_shown_surface() {
    let h = harness(None);
    h.router.start().await.unwrap();
    assert_eq!(h.surfaces.visible(), vec!["dashboard-surface"]);

    h.router.register_route(
        RouteDescriptor::new("dashboard", "Bridge")
            .hotkey("F1")
            .surface("navigation-surface"),
    );
    h.router.navigate("crew", false).await.unwrap();

    assert_eq!(h.surfaces.visible(), vec!["crew-surface"]);
    assert_eq!(h.surfaces.phase("dashboard-surface"), SurfacePhase::Hidden);
}

/// Reads router state from inside `play`, which would deadlock if a cue
/// were played while the router held its own lock
#[derive(Default)]
struct ReentrantBell {
    router: OnceLock<Weak<Router>>,
    alerts: Mutex<Vec<Option<String>>>,
}

impl AudioSink for ReentrantBell {
    fn play(&self, cue: Cue) {
        if cue != Cue::Alert {
            return;
        }
        if let Some(router) = self.router.get().and_then(Weak::upgrade) {
            self.alerts.lock().unwrap().push(router.current_route());
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fallback_alert_plays_outside_router_lock() {
    let bell = Arc::new(ReentrantBell::default());
    let journal = HookJournal::default();
    let router = common::console_builder(
        RecordingSurfaces::with(ROUTES),
        CountingSlot::new(None),
        &journal,
    )
    .audio(bell.clone())
    .build();
    bell.router.set(Arc::downgrade(&router)).ok();
    router.start().await.unwrap();
    router.navigate("crew", false).await.unwrap();

    let task = {
        let router = router.clone();
        tokio::spawn(async move { router.navigate("warp-core", false).await })
    };
    let outcome = tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("fallback navigation deadlocked")
        .unwrap()
        .unwrap();

    assert_eq!(outcome.route(), "dashboard");
    assert_eq!(*bell.alerts.lock().unwrap(), vec![Some("crew".to_string())]);
}

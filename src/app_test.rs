use crate::{
    app::App,
    dataset::{CountryRecord, Dataset},
    handlers::handle_chat_event,
};
use log::*;
use mobot::*;

fn single_country_dataset() -> Dataset {
    Dataset::new(vec![CountryRecord {
        country: "France".into(),
        capital: "Paris".into(),
        lat: 48.9,
        lon: 2.4,
        image: "images/fr.png".into(),
        colored_image: "images/fr_colored.png".into(),
    }])
    .unwrap()
}

#[tokio::test]
async fn plays_a_full_round_over_chat() {
    mobot::init_logger();

    // Create a FakeAPI and attach it to the client. Any Telegram requests are now forwarded
    // to `fakeserver` instead.
    let fakeserver = fake::FakeAPI::new();
    let client = Client::new("token".to_string()).with_post_handler(fakeserver.clone());

    // Keep the Telegram poll timeout short for testing. The default Telegram poll timeout is 60s.
    let mut router = Router::new(client)
        .with_state(App::new("Capitle".into(), single_country_dataset()))
        .with_poll_timeout_s(1);

    router.add_route(Route::Message(Matcher::Any), handle_chat_event);

    // Since we're passing ownership of the Router to a background task, grab the
    // shutdown channels so we can shut it down from this task.
    let (shutdown_notifier, shutdown_tx) = router.shutdown();

    // Start the router in a background task.
    tokio::spawn(async move {
        info!("Starting router...");
        router.start().await;
    });

    let chat = fakeserver.create_chat("qubyte").await;

    // The first message starts a round. With a single-country dataset the
    // target is deterministic.
    chat.send_text("hello").await.unwrap();
    let reply = chat.recv_update().await.unwrap().to_string();
    assert!(
        reply.contains("Guess the capital of France"),
        "unexpected reply: {}",
        reply
    );

    // A wrong-but-valid guess would need a second capital, so misspell one.
    chat.send_text("Marseille").await.unwrap();
    let reply = chat.recv_update().await.unwrap().to_string();
    assert!(
        reply.contains("not a Capital"),
        "unexpected reply: {}",
        reply
    );

    // Guess the capital, accented and lowercased, and win.
    chat.send_text("párís").await.unwrap();
    let reply = chat.recv_update().await.unwrap().to_string();
    assert!(reply.contains("Correct"), "unexpected reply: {}", reply);

    // All done, shutdown the router and wait for it to complete.
    info!("Shutting down...");
    shutdown_tx.send(()).await.unwrap();
    shutdown_notifier.notified().await;
}

use anyhow::Result;
use listing_engine::Session;
use listing_engine::config::Config;
use listing_engine::dropdown::ReferenceList;

#[tokio::test]
#[ignore] // Requires a reachable backend configured in config.toml or the environment
async fn test_states_against_live_backend() -> Result<()> {
    let session = Session::from_config(Config::load()?)?;
    let form = session.form("for-sale-houses-apartments", None);

    let states = form.reference_options(&ReferenceList::States).await?;
    assert!(!states.is_empty());
    Ok(())
}

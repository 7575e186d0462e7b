use anyhow::Result;

// Needs the server running on :8080 against a seeded database.
#[tokio::test]
#[ignore]
async fn quick_dev() -> Result<()> {
    let hc = httpc_test::new_client("http://localhost:8080/api/v1")?;

    hc.do_get("/posts").await?.print().await?;

    hc.do_get("/posts/1").await?.print().await?;

    Ok(())
}

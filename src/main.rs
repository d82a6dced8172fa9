use edumate_service::api;
use edumate_service::common::init;
use edumate_service::settings::AppSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::get();
    init::initialize_logging(settings);
    match settings.app_component.as_str() {
        "api" => api::serve(settings).await,
        "migrate" => {
            let db = init::initialize_db(settings).await?;
            init::run_migrations(&db).await
        }
        component => anyhow::bail!("Unknown app component: {component}"),
    }
}

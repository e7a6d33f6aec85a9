use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use wenku_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{EmailService, StripeService},
    handlers,
    middlewares::{IdentityMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 创建JWT服务
    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // 创建外部服务
    let stripe_service = StripeService::new(config.stripe.clone());
    let email_service = EmailService::new(config.email.clone());

    // 创建服务
    let identity_service = IdentityService::new(pool.clone());
    let entitlement_service = EntitlementService::new(pool.clone());
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone(), email_service.clone());
    let user_service = UserService::new(pool.clone(), entitlement_service.clone());
    let novel_service = NovelService::new(pool.clone());
    let comment_service = CommentService::new(pool.clone());
    let gift_service = GiftService::new(pool.clone());
    let payment_service = PaymentService::new(pool.clone(), stripe_service.clone());
    let reconcile_service = ReconcileService::new(
        pool.clone(),
        stripe_service.clone(),
        email_service.clone(),
    );
    let reading_service = ReadingService::new(pool.clone());
    let admin_service = AdminService::new(pool.clone());
    let contact_service = ContactService::new(pool.clone(), email_service.clone());

    // 后台字数统计任务（每小时重算章节与全书字数）
    {
        let novel_service_clone = novel_service.clone();
        tokio::spawn(async move {
            loop {
                match novel_service_clone.update_word_counts().await {
                    Ok((chapters_updated, novels_updated)) => {
                        log::info!(
                            "Word count sweep done: {} chapters, {} novels updated",
                            chapters_updated,
                            novels_updated
                        );
                    }
                    Err(e) => {
                        log::error!("Word count sweep failed: {:?}", e);
                    }
                }
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            }
        });
    }

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(IdentityMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(identity_service.clone()))
            .app_data(web::Data::new(entitlement_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(novel_service.clone()))
            .app_data(web::Data::new(comment_service.clone()))
            .app_data(web::Data::new(gift_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(reconcile_service.clone()))
            .app_data(web::Data::new(reading_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .app_data(web::Data::new(contact_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api")
                    .configure(handlers::auth_config)
                    .configure(handlers::user_config)
                    .configure(handlers::novel_config)
                    .configure(handlers::comment_config)
                    .configure(handlers::gift_config)
                    .configure(handlers::payment_config)
                    .configure(handlers::reading_config)
                    .configure(handlers::bookshelf_config)
                    .configure(handlers::contact_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}

use crate::config::EmailConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde_json::json;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Admin-facing notification templates.
#[derive(Debug, Clone)]
pub enum AdminNotification {
    NewUser {
        username: String,
        email: String,
        role: String,
    },
    NewAuthor {
        username: String,
        email: String,
    },
    NewContactForm {
        subject: Option<String>,
        message: String,
    },
    NewSubscription {
        username: String,
        email: String,
        plan_name: String,
    },
}

#[derive(Clone)]
pub struct EmailService {
    client: Client,
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        let body = json!({
            "from": self.config.from,
            "to": [to],
            "subject": subject,
            "html": html,
        });

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            log::info!("Email sent to {to}: {subject}");
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Email delivery to {to} failed: {error_text}");
            Err(AppError::ExternalApiError(format!(
                "Email sending failed: {error_text}"
            )))
        }
    }

    /// 会员订阅确认邮件。
    pub async fn send_payment_confirmation(
        &self,
        to: &str,
        user_name: &str,
        plan_name: &str,
        amount_display: &str,
        end_date_display: &str,
    ) -> AppResult<()> {
        let site = &self.config.site_name;
        let subject = format!("{site} - 会员订阅确认");
        let html = format!(
            r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #B91C1C; text-align: center;">{site}</h1>
  <div style="background-color: #f8f8f8; padding: 20px; border-radius: 8px;">
    <h2>您好 {user_name}，</h2>
    <p>感谢您订阅{site}会员服务！</p>
    <div style="background-color: white; padding: 15px; border-radius: 4px; margin: 20px 0;">
      <h3 style="margin: 0;">订阅详情：</h3>
      <p>会员计划：{plan_name}</p>
      <p>支付金额：{amount_display}</p>
      <p>有效期至：{end_date_display}</p>
    </div>
    <p>您现在可以畅享所有会员专属内容。</p>
    <p>如有任何问题，请随时联系我们。</p>
  </div>
  <p style="text-align: center; color: #666; font-size: 12px; margin-top: 20px;">
    此邮件由系统自动发送，请勿回复
  </p>
</div>"#
        );

        self.send(to, &subject, &html).await
    }

    /// 管理员通知邮件（注册 / 作者申请 / 联系表单 / 新订阅）。
    pub async fn send_admin_notification(&self, notification: AdminNotification) -> AppResult<()> {
        if self.config.admin_email.is_empty() {
            log::warn!("ADMIN_EMAIL not configured, skipping admin notification");
            return Ok(());
        }

        let site = &self.config.site_name;
        let (subject, html) = match notification {
            AdminNotification::NewUser {
                username,
                email,
                role,
            } => (
                format!("{site} - 新用户注册通知"),
                format!(
                    r#"<h2>新用户注册通知</h2>
<p>用户名: {username}</p>
<p>邮箱: {email}</p>
<p>角色: {role}</p>
<p>请登录管理后台查看详情。</p>"#
                ),
            ),
            AdminNotification::NewAuthor { username, email } => (
                format!("{site} - 新作者申请通知"),
                format!(
                    r#"<h2>新作者申请</h2>
<p>用户名: {username}</p>
<p>邮箱: {email}</p>
<p>请登录管理后台审核申请。</p>"#
                ),
            ),
            AdminNotification::NewContactForm { subject, message } => (
                subject.unwrap_or_else(|| format!("{site} - 新的联系表单提交")),
                format!(
                    r#"<h2>新的联系表单</h2>
<p>{message}</p>
<p>请及时回复处理。</p>"#
                ),
            ),
            AdminNotification::NewSubscription {
                username,
                email,
                plan_name,
            } => (
                format!("{site} - 新会员订阅通知"),
                format!(
                    r#"<h2>新订阅</h2>
<p>用户 {username} ({email}) 订阅了 {plan_name} 计划。</p>"#
                ),
            ),
        };

        let admin_email = self.config.admin_email.clone();
        self.send(&admin_email, &subject, &html).await
    }
}

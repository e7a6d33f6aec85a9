use crate::entities::contact_form_entity as contact_forms;
use crate::error::{AppError, AppResult};
use crate::external::{AdminNotification, EmailService};
use crate::models::ContactFormRequest;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

#[derive(Clone)]
pub struct ContactService {
    pool: DatabaseConnection,
    email_service: EmailService,
}

impl ContactService {
    pub fn new(pool: DatabaseConnection, email_service: EmailService) -> Self {
        Self {
            pool,
            email_service,
        }
    }

    pub async fn submit(&self, req: ContactFormRequest) -> AppResult<()> {
        if req.title.trim().is_empty() || req.content.trim().is_empty() || !req.email.contains('@')
        {
            return Err(AppError::ValidationError(
                "请填写所有必填字段".to_string(),
            ));
        }

        contact_forms::ActiveModel {
            title: Set(req.title.trim().to_string()),
            content: Set(req.content.trim().to_string()),
            email: Set(req.email.trim().to_string()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        // 管理员通知失败不影响表单提交结果
        if let Err(e) = self
            .email_service
            .send_admin_notification(AdminNotification::NewContactForm {
                subject: Some(req.title),
                message: format!("{} ({})", req.content, req.email),
            })
            .await
        {
            log::error!("Failed to send contact form notification: {e}");
        }

        Ok(())
    }
}

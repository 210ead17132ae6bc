use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::AppSettingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_settings::dsl::*;
use budgetbook_core::errors::Result;
use budgetbook_core::settings::SettingsRepositoryTrait;

pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_setting(&self, setting_key_param: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let value = app_settings
            .filter(setting_key.eq(setting_key_param))
            .select(setting_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(value)
    }

    async fn update_setting(
        &self,
        setting_key_param: &str,
        setting_value_param: &str,
    ) -> Result<()> {
        let row = AppSettingDB {
            setting_key: setting_key_param.to_string(),
            setting_value: setting_value_param.to_string(),
        };

        self.writer
            .exec(move |conn| {
                diesel::replace_into(app_settings)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}

use crate::get_db_connection;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use trackgate_error::StorageResult;
use trackgate_models::domain::prelude::{NewDeviceModel, Substitutions};
use trackgate_models::entities::prelude::{DeviceModel, DeviceModelActiveModel, DeviceModelModel};

pub struct DeviceModelRepository;

impl DeviceModelRepository {
    pub async fn create(model: NewDeviceModel) -> StorageResult<()> {
        let db = get_db_connection()?;
        DeviceModelActiveModel {
            name: Set(model.name),
            init_commands: Set(model.init_commands),
            success_keywords: Set(model.success_keywords),
        }
        .insert(&db)
        .await?;
        Ok(())
    }

    /// All models with `<ip>`/`<port>` placeholders substituted. The
    /// substitution belongs to the read path so the stored templates
    /// survive configuration changes.
    pub async fn find_all(subst: &Substitutions) -> StorageResult<Vec<DeviceModelModel>> {
        let db = get_db_connection()?;
        let rows = DeviceModel::find().all(&db).await?;
        Ok(rows.into_iter().map(|m| substitute(m, subst)).collect())
    }

    pub async fn find_by_name(
        name: &str,
        subst: &Substitutions,
    ) -> StorageResult<Option<DeviceModelModel>> {
        let db = get_db_connection()?;
        Ok(DeviceModel::find_by_id(name)
            .one(&db)
            .await?
            .map(|m| substitute(m, subst)))
    }

    pub async fn delete(name: &str) -> StorageResult<bool> {
        let db = get_db_connection()?;
        let res = DeviceModel::delete_by_id(name).exec(&db).await?;
        Ok(res.rows_affected == 1)
    }
}

fn substitute(mut model: DeviceModelModel, subst: &Substitutions) -> DeviceModelModel {
    model.init_commands = subst.apply(&model.init_commands);
    model.success_keywords = subst.apply(&model.success_keywords);
    model
}

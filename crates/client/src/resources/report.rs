//! Report templates and the reports generated from them

use serde::{Deserialize, Serialize};

use vxsdk_common::{
    Collection, CollectionQuery, FilterKey, Id, Name, ReportField, ReportFormat, Result, Timestamp,
};

use super::resource_data;
use crate::handle::{check_id, ensure_known, Handle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportTemplateData {
    pub id: Id,
    pub name: Name,
    pub format: ReportFormat,
    pub fields: Vec<ReportField>,
}

resource_data!(ReportTemplateData, "reportTemplates");

pub type ReportTemplate = Handle<ReportTemplateData>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportData {
    pub id: Id,
    pub name: Name,
    pub template_id: Id,
    pub format: ReportFormat,
    pub created: Timestamp,
}

resource_data!(ReportData, "reports");

pub type Report = Handle<ReportData>;

/// Filters accepted by [`ReportTemplate::reports`]
pub const REPORT_FILTERS: &[FilterKey] = &[FilterKey::Name, FilterKey::StartTime, FilterKey::EndTime];

impl Handle<ReportTemplateData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn set_format(&mut self, format: ReportFormat) -> Result<()> {
        let format = ensure_known("format", format)?;
        self.update("format", format, |d, v| d.format = v).await
    }

    pub async fn set_fields(&mut self, fields: Vec<ReportField>) -> Result<()> {
        self.update("fields", fields, |d, v| d.fields = v).await
    }

    /// Reports generated from this template
    pub async fn reports(&self, query: &CollectionQuery) -> Result<Collection<Handle<ReportData>>> {
        self.related("reports", query, REPORT_FILTERS).await
    }
}

impl Handle<ReportData> {
    /// The template this report was generated from
    pub async fn template(&self) -> Result<Handle<ReportTemplateData>> {
        let id = check_id("templateId", &self.template_id)?;
        let path = format!("reportTemplates/{}", id);
        Handle::fetch(self.transport().clone(), path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::seeded;
    use serde_json::json;

    #[tokio::test]
    async fn test_template_fields_and_reports() {
        let (mock, mut template) =
            seeded::<ReportTemplateData>("reportTemplates/t1", json!({"name": "Daily", "format": "csv"})).await;

        let fields = vec![ReportField {
            name: "deviceName".parse().unwrap(),
            label: "Device".parse().unwrap(),
            is_visible: true,
        }];
        template.set_fields(fields).await.unwrap();
        assert_eq!(mock.get("reportTemplates/t1").unwrap()["fields"][0]["isVisible"], true);

        mock.insert("reports/rep-1", json!({"name": "Monday", "templateId": "t1", "format": "csv"}));
        mock.link("reportTemplates/t1", "reports", "rep-1");
        let reports = template.reports(&CollectionQuery::new()).await.unwrap();
        assert_eq!(reports.len(), 1);

        let back = reports.items[0].template().await.unwrap();
        assert_eq!(back.format, ReportFormat::Csv);
        assert_eq!(back.fields.len(), 1);
    }
}

//! Campaign execution engine
//!
//! For every vendor targeted by a campaign:
//!
//! 1. Ensure a Pending response row exists for the (campaign, vendor)
//!    pair — created once, never duplicated.
//! 2. If the campaign has an email template and the vendor has an email,
//!    render and dispatch it; log the send on success.
//! 3. Independently, if the campaign has a WhatsApp template and the
//!    vendor has a phone, normalize the number and dispatch; log the send
//!    on success.
//!
//! A failure against one vendor never aborts the loop and there is no
//! retry; partial completion is a normal outcome and the returned report
//! is the authoritative record of what was delivered. The loop is
//! sequential — one outbound call at a time, bounded by provider latency.

use serde::Serialize;
use surrealdb::RecordId;

use crate::campaigns::render;
use crate::core::ServerState;
use crate::db::models::{CampaignStatus, Channel};
use crate::services::whatsapp::clean_phone_number;
use crate::utils::{AppError, AppResult};

/// Outcome of one channel for one vendor
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChannelOutcome {
    /// No template configured, or the vendor has no address for the channel
    NotAttempted,
    Sent { recipient: String },
    Failed { reason: String },
}

impl ChannelOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, ChannelOutcome::Sent { .. })
    }
}

/// Per-vendor result record
#[derive(Debug, Clone, Serialize)]
pub struct VendorDispatch {
    pub vendor_id: String,
    pub vendor_name: String,
    pub email: ChannelOutcome,
    pub whatsapp: ChannelOutcome,
}

/// One failed dispatch, flattened for the summary
#[derive(Debug, Clone, Serialize)]
pub struct DispatchError {
    pub vendor_name: String,
    pub channel: Channel,
    pub message: String,
}

/// Execution summary returned to the caller
#[derive(Debug, Serialize)]
pub struct ExecutionReport {
    pub campaign_id: String,
    pub total_vendors: usize,
    /// Addresses successfully emailed
    pub emails_sent: Vec<String>,
    /// Normalized numbers successfully messaged
    pub whatsapp_sent: Vec<String>,
    pub errors: Vec<DispatchError>,
    pub results: Vec<VendorDispatch>,
}

pub struct CampaignExecutor {
    state: ServerState,
}

impl CampaignExecutor {
    pub fn new(state: ServerState) -> Self {
        Self { state }
    }

    /// Run the campaign against its target vendors and return the report.
    ///
    /// The campaign ends up `Active` whatever the delivery outcome; the
    /// report tells the caller what actually went out.
    pub async fn execute(&self, campaign_id: &RecordId) -> AppResult<ExecutionReport> {
        let campaigns = self.state.campaigns();
        let campaign = campaigns
            .find_by_id(campaign_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Campaign {} not found", campaign_id)))?;

        match campaign.status {
            CampaignStatus::Draft | CampaignStatus::Active => {}
            _ => {
                return Err(AppError::validation(
                    "Only draft or active campaigns can be executed",
                ));
            }
        }

        let email_template = match &campaign.email_template_id {
            Some(id) => self.state.email_templates().find_by_id(id).await?,
            None => None,
        };
        let whatsapp_template = match &campaign.whatsapp_template_id {
            Some(id) => self.state.whatsapp_templates().find_by_id(id).await?,
            None => None,
        };

        // Target ids that no longer resolve are skipped
        let vendors = self
            .state
            .vendors()
            .find_by_ids(&campaign.target_vendors)
            .await?;

        tracing::info!(
            campaign = %campaign_id,
            vendors = vendors.len(),
            email = email_template.is_some(),
            whatsapp = whatsapp_template.is_some(),
            "Executing campaign"
        );

        let mut results: Vec<VendorDispatch> = Vec::with_capacity(vendors.len());

        for vendor in &vendors {
            let Some(vendor_id) = vendor.id.clone() else {
                continue;
            };

            self.ensure_response_row(campaign_id, &vendor_id).await?;

            let vars = render::vendor_variables(vendor);

            let email_outcome = match (&email_template, &vendor.email) {
                (Some(template), Some(address)) if !address.is_empty() => {
                    let subject = render::render(&template.subject, &vars);
                    let body = render::render(&template.body, &vars);
                    match self.state.email.send(address, &subject, &body).await {
                        Ok(()) => {
                            self.state
                                .send_logs()
                                .append(campaign_id, &vendor_id, Channel::Email, address)
                                .await?;
                            ChannelOutcome::Sent {
                                recipient: address.clone(),
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                vendor = %vendor.vendor_name,
                                error = %e,
                                "Email dispatch failed, continuing"
                            );
                            ChannelOutcome::Failed {
                                reason: e.to_string(),
                            }
                        }
                    }
                }
                _ => ChannelOutcome::NotAttempted,
            };

            let whatsapp_outcome = match (&whatsapp_template, &vendor.phone) {
                (Some(template), Some(phone)) if !phone.is_empty() => {
                    match clean_phone_number(phone, &self.state.config.default_country_code) {
                        Some(number) => {
                            let body = render::render(&template.content, &vars);
                            match self.state.whatsapp.send(&number, &body).await {
                                Ok(()) => {
                                    self.state
                                        .send_logs()
                                        .append(campaign_id, &vendor_id, Channel::Whatsapp, &number)
                                        .await?;
                                    ChannelOutcome::Sent { recipient: number }
                                }
                                Err(e) => {
                                    tracing::warn!(
                                        vendor = %vendor.vendor_name,
                                        error = %e,
                                        "WhatsApp dispatch failed, continuing"
                                    );
                                    ChannelOutcome::Failed {
                                        reason: e.to_string(),
                                    }
                                }
                            }
                        }
                        None => ChannelOutcome::Failed {
                            reason: format!("Invalid phone number: {phone}"),
                        },
                    }
                }
                _ => ChannelOutcome::NotAttempted,
            };

            results.push(VendorDispatch {
                vendor_id: vendor_id.to_string(),
                vendor_name: vendor.vendor_name.clone(),
                email: email_outcome,
                whatsapp: whatsapp_outcome,
            });
        }

        // Launched regardless of delivery outcome; the report is authoritative
        campaigns
            .set_status(campaign_id, CampaignStatus::Active)
            .await?;

        let report = Self::build_report(campaign_id, vendors.len(), results);
        tracing::info!(
            campaign = %campaign_id,
            emails = report.emails_sent.len(),
            whatsapp = report.whatsapp_sent.len(),
            errors = report.errors.len(),
            "Campaign execution finished"
        );
        Ok(report)
    }

    /// Lookup-before-insert: one response row per (campaign, vendor) pair
    async fn ensure_response_row(
        &self,
        campaign_id: &RecordId,
        vendor_id: &RecordId,
    ) -> AppResult<()> {
        let responses = self.state.responses();
        if responses
            .find_by_pair(campaign_id, vendor_id)
            .await?
            .is_none()
        {
            responses.create_pending(campaign_id, vendor_id).await?;
        }
        Ok(())
    }

    fn build_report(
        campaign_id: &RecordId,
        total_vendors: usize,
        results: Vec<VendorDispatch>,
    ) -> ExecutionReport {
        let mut emails_sent = Vec::new();
        let mut whatsapp_sent = Vec::new();
        let mut errors = Vec::new();

        for dispatch in &results {
            match &dispatch.email {
                ChannelOutcome::Sent { recipient } => emails_sent.push(recipient.clone()),
                ChannelOutcome::Failed { reason } => errors.push(DispatchError {
                    vendor_name: dispatch.vendor_name.clone(),
                    channel: Channel::Email,
                    message: reason.clone(),
                }),
                ChannelOutcome::NotAttempted => {}
            }
            match &dispatch.whatsapp {
                ChannelOutcome::Sent { recipient } => whatsapp_sent.push(recipient.clone()),
                ChannelOutcome::Failed { reason } => errors.push(DispatchError {
                    vendor_name: dispatch.vendor_name.clone(),
                    channel: Channel::Whatsapp,
                    message: reason.clone(),
                }),
                ChannelOutcome::NotAttempted => {}
            }
        }

        ExecutionReport {
            campaign_id: campaign_id.to_string(),
            total_vendors,
            emails_sent,
            whatsapp_sent,
            errors,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatch(name: &str, email: ChannelOutcome, whatsapp: ChannelOutcome) -> VendorDispatch {
        VendorDispatch {
            vendor_id: format!("vendor:{name}"),
            vendor_name: name.to_string(),
            email,
            whatsapp,
        }
    }

    #[test]
    fn test_report_aggregates_outcomes() {
        let id = RecordId::from_table_key("campaign", "c1");
        let results = vec![
            dispatch(
                "Acme",
                ChannelOutcome::Sent {
                    recipient: "a@x.com".into(),
                },
                ChannelOutcome::Failed {
                    reason: "provider down".into(),
                },
            ),
            dispatch(
                "Beta",
                ChannelOutcome::NotAttempted,
                ChannelOutcome::Sent {
                    recipient: "919876543210".into(),
                },
            ),
        ];

        let report = CampaignExecutor::build_report(&id, 2, results);
        assert_eq!(report.emails_sent, vec!["a@x.com"]);
        assert_eq!(report.whatsapp_sent, vec!["919876543210"]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].vendor_name, "Acme");
        assert_eq!(report.errors[0].channel, Channel::Whatsapp);
    }
}

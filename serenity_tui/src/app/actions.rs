use anyhow::Result;
use serenity_render::PrescriptionRenderer;

use crate::app::state::{App, AppState, FooterAction};

/// Runs one footer action to completion. Returns true when the app should
/// quit. Every action blocks the interface until it finishes; there is no
/// background processing and no cancellation.
pub async fn perform_footer_action(app: &mut App, action: FooterAction) -> Result<bool> {
    match action {
        FooterAction::Quit => return Ok(true),
        FooterAction::Send => send_message(app).await?,
        FooterAction::CollectiveAdvice => collective_advice(app).await?,
        FooterAction::GeneratePrescription => generate_prescription(app)?,
    }
    Ok(false)
}

/// The busy label to show while `action` runs, or None when the action
/// will finish without a provider call. The caller draws a frame with
/// this state before awaiting, since nothing repaints mid-action.
pub fn busy_label(app: &App, action: FooterAction) -> Option<&'static str> {
    match action {
        FooterAction::Send if !app.message.trim().is_empty() => Some("Listening"),
        FooterAction::CollectiveAdvice if !app.session.response_pool.is_empty() => {
            Some("Summarizing")
        }
        _ => None,
    }
}

pub async fn send_message(app: &mut App) -> Result<()> {
    if app.message.trim().is_empty() {
        // Nothing is appended and no request goes out.
        return Ok(());
    }

    let profile = app.profile();
    let text = app.message.clone();
    app.session_logger.block("SEND", &text);

    match app
        .advisor
        .send_message(&mut app.session, &profile, &text)
        .await
    {
        Ok(Some(reply)) => {
            app.session_logger.block("REPLY", &reply);
            app.message.clear();
            app.message_cursor = 0;
            app.notice = None;
            app.state = AppState::Editing;
        }
        Ok(None) => {
            app.state = AppState::Editing;
        }
        Err(e) => {
            // The user turn stays on the transcript; no rollback.
            app.set_error(format!("Message failed: {:#}", e));
        }
    }
    app.dirty = true;
    Ok(())
}

pub async fn collective_advice(app: &mut App) -> Result<()> {
    if app.session.response_pool.is_empty() {
        app.set_notice("Nothing to summarize yet. Send a message first.");
        return Ok(());
    }

    match app.advisor.collective_advice(&app.session).await {
        Ok(Some(advice)) => {
            app.session_logger.block("ADVICE", &advice);
            app.advice = Some(advice);
            app.state = AppState::Editing;
        }
        Ok(None) => {
            app.state = AppState::Editing;
        }
        Err(e) => {
            app.set_error(format!("Advice failed: {:#}", e));
        }
    }
    app.dirty = true;
    Ok(())
}

/// One-shot: after the first success the action becomes a no-op. The
/// profile is validated before any file is touched, and the template is
/// reloaded from disk fresh on every attempt.
pub fn generate_prescription(app: &mut App) -> Result<()> {
    if app.session.prescription_generated {
        app.set_notice("Prescription already generated this session.");
        return Ok(());
    }

    let profile = app.profile();
    if let Err(e) = profile.validate_for_prescription() {
        app.set_error(e.to_string());
        return Ok(());
    }

    let prescription = &app.config.prescription;
    let renderer = match PrescriptionRenderer::from_font_file(
        &prescription.font_path,
        prescription.layout.clone(),
    ) {
        Ok(renderer) => renderer,
        Err(e) => {
            app.set_error(format!("{:#}", anyhow::Error::new(e)));
            return Ok(());
        }
    };

    let age = profile.age.unwrap_or_default();
    let body = app.session.response_pool.joined();
    match renderer.render(
        &profile.formatted_name(),
        age,
        &body,
        &prescription.template_path,
        &prescription.output_path,
    ) {
        Ok(_) => {
            app.session_logger.event(
                "PRESCRIPTION",
                &prescription.output_path.display().to_string(),
            );
            app.last_prescription = Some(prescription.output_path.clone());
            app.session.prescription_generated = true;
            app.set_notice(format!(
                "Prescription generated successfully: {}",
                prescription.output_path.display()
            ));
            app.state = AppState::Editing;
        }
        Err(e) => {
            app.set_error(format!("{:#}", anyhow::Error::new(e)));
        }
    }
    app.dirty = true;
    Ok(())
}

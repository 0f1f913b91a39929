// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::update_me,

        // --- Mobile ---
        handlers::mobile::login,
        handlers::mobile::verify,
        handlers::mobile::get_profile,
        handlers::mobile::update_profile,
        handlers::mobile::list_leads,
        handlers::mobile::create_lead,
        handlers::mobile::get_lead,
        handlers::mobile::update_lead,
        handlers::mobile::delete_lead,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::create_lead,
        handlers::leads::get_lead,
        handlers::leads::update_lead,
        handlers::leads::delete_lead,
        handlers::leads::get_board,
        handlers::leads::update_status,
        handlers::leads::move_card,

        // --- Indications ---
        handlers::indications::list_indications,
        handlers::indications::create_indication,
        handlers::indications::update_indication,
        handlers::indications::delete_indication,
        handlers::indications::get_qrcode,

        // --- Pages ---
        handlers::pages::list_pages,
        handlers::pages::create_page,
        handlers::pages::get_page,
        handlers::pages::update_page,
        handlers::pages::delete_page,

        // --- Quizzes ---
        handlers::quizzes::list_quizzes,
        handlers::quizzes::create_quiz,
        handlers::quizzes::get_quiz,
        handlers::quizzes::update_quiz,
        handlers::quizzes::delete_quiz,
        handlers::quizzes::replace_questions,
        handlers::quizzes::publish_quiz,

        // --- Outbound ---
        handlers::outbound::list_contacts,
        handlers::outbound::create_contact,
        handlers::outbound::get_contact,
        handlers::outbound::update_contact,
        handlers::outbound::delete_contact,
        handlers::outbound::add_note,
        handlers::outbound::get_board,
        handlers::outbound::update_status,
        handlers::outbound::move_card,

        // --- Interests ---
        handlers::interests::list_interests,
        handlers::interests::create_interest,
        handlers::interests::delete_interest,

        // --- Cycles ---
        handlers::cycles::list_cycles,
        handlers::cycles::create_cycle,
        handlers::cycles::delete_cycle,
        handlers::cycles::list_checkins,
        handlers::cycles::toggle_checkin,
        handlers::cycles::get_progress,

        // --- DRE ---
        handlers::dre::import_entries,
        handlers::dre::list_entries,
        handlers::dre::get_summary,
        handlers::dre::delete_entry,

        // --- Events ---
        handlers::events::get_stats,

        // --- Public ---
        handlers::public::get_page,
        handlers::public::get_quiz,
        handlers::public::submit_quiz,
        handlers::public::click,
        handlers::public::capture_lead,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserPlan,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::VerifyResponse,
            models::auth::UpdateProfilePayload,

            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::Lead,
            models::lead::Utm,
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadPayload,
            models::lead::LeadUpsertResponse,
            models::lead::LeadBoardColumn,

            // --- Pipeline ---
            models::pipeline::UpdateStatusPayload,
            models::pipeline::MoveCardPayload,
            models::pipeline::MoveResult,

            // --- Indications ---
            models::indication::IndicationKind,
            models::indication::Indication,
            models::indication::IndicationWithStats,
            models::indication::CreateIndicationPayload,
            models::indication::UpdateIndicationPayload,

            // --- Pages ---
            models::page::BlockKind,
            models::page::PageBlock,
            models::page::SocialLink,
            models::page::Page,
            models::page::PageView,
            models::page::CreatePagePayload,
            models::page::UpdatePagePayload,

            // --- Quizzes ---
            models::quiz::QuestionType,
            models::quiz::ScreenConfig,
            models::quiz::Quiz,
            models::quiz::Question,
            models::quiz::QuizView,
            models::quiz::QuizDetail,
            models::quiz::CreateQuizPayload,
            models::quiz::UpdateQuizPayload,
            models::quiz::QuestionInput,
            models::quiz::ReplaceQuestionsPayload,
            models::quiz::PublishQuizPayload,
            models::quiz::AnswerValue,
            models::quiz::QuizContact,
            models::quiz::QuizSubmissionPayload,
            models::quiz::QuizSubmissionResponse,

            // --- Outbound ---
            models::outbound::OutboundStatus,
            models::outbound::ContactNoteType,
            models::outbound::OutboundContact,
            models::outbound::ContactNote,
            models::outbound::OutboundDetail,
            models::outbound::CreateOutboundPayload,
            models::outbound::UpdateOutboundPayload,
            models::outbound::CreateNotePayload,
            models::outbound::OutboundBoardColumn,

            // --- Interests ---
            models::interest::InterestOption,
            models::interest::CreateInterestPayload,

            // --- Cycles ---
            models::cycle::Cycle,
            models::cycle::CycleCheckin,
            models::cycle::CreateCyclePayload,
            models::cycle::ToggleCheckinPayload,
            models::cycle::ToggleCheckinResponse,
            models::cycle::HabitProgress,
            models::cycle::CycleProgress,

            // --- DRE ---
            models::dre::DreKind,
            models::dre::DreEntry,
            models::dre::ColumnMapping,
            models::dre::DreImportPayload,
            models::dre::SkippedRow,
            models::dre::DreImportReport,
            models::dre::CategoryTotal,
            models::dre::DreSummary,

            // --- Events ---
            models::event::EventType,
            models::event::EventTypeCount,
            models::event::UtmSourceCount,
            models::event::EventStats,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Médico e Perfil"),
        (name = "Mobile", description = "API do Aplicativo"),
        (name = "Leads", description = "Leads e Quadro de Atendimento"),
        (name = "Indications", description = "Links de Indicação e QR Code"),
        (name = "Pages", description = "Páginas de Links"),
        (name = "Quizzes", description = "Quizzes de Captação"),
        (name = "Outbound", description = "Prospecção Ativa"),
        (name = "Interests", description = "Opções de Interesse"),
        (name = "Cycles", description = "Ciclos de Hábitos"),
        (name = "DRE", description = "Demonstrativo de Resultado"),
        (name = "Events", description = "Cliques e Conversões"),
        (name = "Public", description = "Rotas Abertas ao Paciente")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

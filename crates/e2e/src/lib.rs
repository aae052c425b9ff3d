pub mod client;
pub mod fixtures;
pub mod runner;
pub mod specs;

/// Invoke `$mac!(module::name)` for every E2E spec.
///
/// This is the **single source of truth** for the spec list. Adding a new
/// spec here automatically registers it in `runner::run_all` and
/// `tests/server.rs`.
#[macro_export]
macro_rules! for_each_spec {
    ($mac:ident) => {
        // health (1)
        $mac!(health::health_check);

        // auth (6)
        $mac!(auth::register_then_login);
        $mac!(auth::register_duplicate_email_conflict);
        $mac!(auth::login_wrong_password_rejected);
        $mac!(auth::refresh_rotates_tokens);
        $mac!(auth::change_password_requires_current);
        $mac!(auth::profile_reports_team_context);

        // teams (6)
        $mac!(teams::create_team_makes_creator_owner);
        $mac!(teams::second_team_is_conflict);
        $mac!(teams::get_team_detail_counts_members);
        $mac!(teams::update_team_requires_account_admin);
        $mac!(teams::add_member_by_email);
        $mac!(teams::last_owner_cannot_be_removed);

        // projects (5)
        $mac!(projects::create_project);
        $mac!(projects::duplicate_project_name_conflict);
        $mac!(projects::archived_projects_hidden_by_default);
        $mac!(projects::team_member_cannot_create_project);
        $mac!(projects::update_project_fields);

        // objectives (7)
        $mac!(objectives::create_skipping_brainstorm_starts_at_11);
        $mac!(objectives::create_with_brainstorm_starts_at_1);
        $mac!(objectives::step_save_merges_answers);
        $mac!(objectives::unknown_step_field_rejected);
        $mac!(objectives::completing_journey_stamps_date);
        $mac!(objectives::lock_blocks_other_member);
        $mac!(objectives::resume_reports_lock_state);

        // tasks (5)
        $mac!(tasks::create_and_list_in_order);
        $mac!(tasks::reorder_persists_new_order);
        $mac!(tasks::reorder_rejects_mismatched_ids);
        $mac!(tasks::assignments_replace_as_a_set);
        $mac!(tasks::delete_task);

        // rrgt (4)
        $mac!(rrgt::mine_provisions_plans_for_assigned_tasks);
        $mac!(rrgt::rabbit_moves_within_range);
        $mac!(rrgt::subtask_cell_upserts);
        $mac!(rrgt::god_view_requires_account_admin);

        // dial (3)
        $mac!(dial::dial_round_trips);
        $mac!(dial::dial_rejects_foreign_plan);
        $mac!(dial::privacy_blanks_god_view);

        // journeys (4)
        $mac!(journeys::guest_session_round_trips);
        $mac!(journeys::duplicate_session_id_conflict);
        $mac!(journeys::export_bundles_session_and_tasks);
        $mac!(journeys::guest_tasks_crud);

        // touchbases (2)
        $mac!(touchbases::create_and_list_newest_first);
        $mac!(touchbases::touchbases_require_membership);
    };
}

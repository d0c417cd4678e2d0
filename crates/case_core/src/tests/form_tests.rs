use super::*;
use crate::fixtures::{day, proceeding, writ};
use shared::domain::{InvestigatingOfficer, Petitioner, WritStatus};

fn person(name: &str) -> PersonDraft {
    PersonDraft {
        name: name.into(),
        rank: "Inspector".into(),
        mobile: "9000000000".into(),
    }
}

fn pdf(size: usize) -> AttachmentUpload {
    AttachmentUpload {
        filename: "notice.pdf".into(),
        mime_type: "application/pdf".into(),
        bytes: vec![1; size],
    }
}

#[test]
fn stages_advance_from_writ_to_ready() {
    let mut form = ProceedingForm::new();
    assert_eq!(form.stage(), FormStage::WritUnselected);

    form.select_writ(&writ("W1", WritType::Direction));
    assert_eq!(form.stage(), FormStage::WritSelected);

    form.set_kind(ProceedingKind::AnyOther);
    assert_eq!(form.stage(), FormStage::KindSelected);

    form.hearing.date_of_hearing = Some(day("2024-06-01"));
    form.any_other.details = "Adjourned at request of counsel".into();
    assert_eq!(form.stage(), FormStage::Ready);
}

#[test]
fn argument_is_offered_only_for_quashing_writs() {
    let quashing = writ("WQ", WritType::Quashing);
    let bail = writ("WB", WritType::Bail);

    let mut form = ProceedingForm::for_writ(&quashing);
    assert!(form.available_kinds().contains(&ProceedingKind::Argument));
    assert_eq!(form.set_kind(ProceedingKind::Argument), ProceedingKind::Argument);

    form.select_writ(&bail);
    assert_eq!(form.kind(), Some(ProceedingKind::NoticeOfMotion));
    assert!(!form.available_kinds().contains(&ProceedingKind::Argument));
    assert_eq!(
        form.set_kind(ProceedingKind::Argument),
        ProceedingKind::NoticeOfMotion
    );
}

#[test]
fn notice_entries_send_only_the_people_of_their_mode() {
    let mut form = ProceedingForm::for_writ(&writ("W1", WritType::Bail));
    form.set_kind(ProceedingKind::NoticeOfMotion);
    form.hearing.date_of_hearing = Some(day("2024-06-01"));

    let first = form.notice_entry_mut(0).expect("first row");
    first.mode = Some(AttendanceMode::ByFormat);
    first.format_filled_by = person("Clerk");
    first.appearing_advocate = person("AAG Sharma");
    first.attending_officer = person("Should Not Be Sent");

    let second = form.add_notice_entry();
    let second = form.notice_entry_mut(second).expect("second row");
    second.mode = Some(AttendanceMode::ByPerson);
    second.attending_officer = person("Inspector Rao");
    second.investigating_officer = person("SI Singh");

    let submission = form.validate().expect("valid");
    match submission.payload.details {
        ProceedingDetails::NoticeOfMotion(entries) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].mode(), AttendanceMode::ByFormat);
            assert_eq!(entries[1].mode(), AttendanceMode::ByPerson);
            let NoticeOfMotionEntry::ByFormat(by_format) = &entries[0] else {
                panic!("expected by-format entry");
            };
            assert_eq!(by_format.appearing_advocate.name, "AAG Sharma");
        }
        other => panic!("unexpected details: {other:?}"),
    }
}

#[test]
fn each_notice_entry_is_validated_against_its_own_mode() {
    let mut form = ProceedingForm::for_writ(&writ("W1", WritType::Bail));
    form.set_kind(ProceedingKind::NoticeOfMotion);
    form.hearing.date_of_hearing = Some(day("2024-06-01"));
    {
        let row = form.notice_entry_mut(0).expect("row");
        row.mode = Some(AttendanceMode::ByPerson);
        row.attending_officer = person("Inspector Rao");
        row.format_filled_by = person("Irrelevant");
    }
    form.add_notice_entry();

    let err = form.validate().expect_err("second row has no mode");
    assert!(err.has_field("noticeOfMotion[0].investigatingOfficer.name"));
    assert!(err.has_field("noticeOfMotion[1].attendanceMode"));
    assert!(!err.has_field("noticeOfMotion[0].appearingAdvocate.name"));
}

#[test]
fn rows_can_be_added_and_removed_but_never_below_one() {
    let mut form = ProceedingForm::new();
    assert!(!form.remove_notice_entry(0));
    let index = form.add_notice_entry();
    assert_eq!(index, 1);
    assert!(form.remove_notice_entry(0));
    assert_eq!(form.notice_entries().len(), 1);
    assert!(!form.remove_notice_entry(5));

    form.add_reply_entry();
    assert_eq!(form.reply_entries().len(), 2);
    assert!(form.remove_reply_entry(1));
    assert!(!form.remove_reply_entry(0));
}

#[test]
fn reply_filing_date_is_required_once_filed() {
    let mut form = ProceedingForm::for_writ(&writ("W1", WritType::Payroll));
    form.set_kind(ProceedingKind::ToFileReply);
    form.hearing.date_of_hearing = Some(day("2024-06-01"));
    {
        let row = form.reply_entry_mut(0).expect("row");
        row.officer_deadline = Some(day("2024-05-20"));
        row.advocate_deadline = Some(day("2024-05-25"));
        row.reply_filed = true;
    }
    let err = form.validate().expect_err("filing date missing");
    assert!(err.has_field("replyTracking[0].replyFilingDate"));

    form.reply_entry_mut(0).expect("row").reply_filing_date = Some(day("2024-05-24"));
    let submission = form.validate().expect("valid");
    assert_eq!(submission.payload.details.kind(), ProceedingKind::ToFileReply);
}

#[test]
fn submission_requires_writ_and_hearing_date() {
    let mut form = ProceedingForm::new();
    form.set_kind(ProceedingKind::AnyOther);
    form.any_other.details = "Misc".into();

    let err = form.validate().expect_err("incomplete");
    assert!(err.has_field("fir"));
    assert!(err.has_field("hearingDetails.dateOfHearing"));
    assert!(err.to_string().starts_with("form is incomplete"));
}

#[test]
fn rejected_attachment_clears_the_file_input() {
    let mut form = ProceedingForm::new();
    form.attach(pdf(250 * 1024)).expect("exactly 250 KiB is accepted");
    assert!(form.attachment().is_some());

    let err = form.attach(pdf(251 * 1024)).expect_err("too large");
    assert!(matches!(err, AttachmentError::TooLarge { .. }));
    assert!(form.attachment().is_none());

    let docx = AttachmentUpload {
        filename: "reply.docx".into(),
        mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            .into(),
        bytes: vec![1; 10],
    };
    assert!(matches!(
        form.attach(docx),
        Err(AttachmentError::UnsupportedType { .. })
    ));
}

#[test]
fn reset_keeps_writ_only_for_writ_scoped_forms() {
    let target = writ("W1", WritType::Quashing);
    let mut form = ProceedingForm::for_writ(&target);
    form.set_kind(ProceedingKind::Argument);
    form.summary = "Arguments heard".into();

    form.reset(true);
    assert_eq!(form.selected_writ(), Some(&target.id));
    assert_eq!(form.kind(), None);
    assert!(form.summary.is_empty());

    form.reset(false);
    assert_eq!(form.stage(), FormStage::WritUnselected);
}

#[test]
fn resuming_a_draft_restores_its_fields() {
    let target = writ("W1", WritType::Quashing);
    let mut draft = proceeding("draft-1", "W1", 4, Some("2024-07-01"));
    draft.draft = true;
    draft.summary = Some("Partially drafted".into());
    draft.details = ProceedingDetails::Argument(ArgumentDetails {
        details: "Points on delay".into(),
        next_date_of_hearing: None,
    });

    let form = ProceedingForm::resume(&target, &draft);
    assert_eq!(form.kind(), Some(ProceedingKind::Argument));
    assert_eq!(form.argument.details, "Points on delay");
    assert_eq!(form.resumed_draft(), Some(&draft.id));
    assert!(form.save_as_draft);

    let submission = form.validate().expect("complete draft");
    assert!(submission.payload.draft);
    assert_eq!(submission.payload.draft_id, Some(draft.id.clone()));
    assert_eq!(submission.resumed_draft, Some(draft.id.clone()));
}

fn new_writ(writ_type: WritType) -> NewWrit {
    NewWrit {
        fir_number: "FIR-77/2024".into(),
        writ_number: "CRWP-900".into(),
        year: Some(2024),
        writ_type,
        bail_type: None,
        date_of_filing: None,
        branch: "Cyber Cell".into(),
        police_station: "Phase 8".into(),
        sections: Vec::new(),
        investigating_officers: vec![InvestigatingOfficer {
            name: "R. Singh".into(),
            rank: "SI".into(),
            ..InvestigatingOfficer::default()
        }],
        petitioner: Petitioner {
            name: "Harjeet Kaur".into(),
            ..Petitioner::default()
        },
        respondents: Vec::new(),
        status: WritStatus::Registered,
    }
}

#[test]
fn writ_form_requires_bail_type_only_for_bail_writs() {
    let form = WritForm::new(new_writ(WritType::Bail));
    let err = form.validate().expect_err("bail type missing");
    assert!(err.has_field("bailType"));

    let mut payload = new_writ(WritType::Bail);
    payload.bail_type = Some(shared::domain::BailType::Regular);
    assert!(WritForm::new(payload).validate().is_ok());

    let mut payload = new_writ(WritType::Direction);
    payload.bail_type = Some(shared::domain::BailType::Anticipatory);
    assert!(WritForm::new(payload).validate().is_err());
}

#[test]
fn writ_form_needs_an_investigating_officer_with_a_sane_tenure() {
    let mut payload = new_writ(WritType::Quashing);
    payload.investigating_officers.clear();
    let err = WritForm::new(payload).validate().expect_err("no officer");
    assert!(err.has_field("investigatingOfficers"));

    let mut payload = new_writ(WritType::Quashing);
    payload.investigating_officers[0].from = Some(day("2024-03-01"));
    payload.investigating_officers[0].to = Some(day("2024-01-01"));
    let err = WritForm::new(payload).validate().expect_err("bad tenure");
    assert!(err.has_field("investigatingOfficers[0].to"));
}

#[test]
fn payload_read_from_elsewhere_is_revalidated() {
    let target = writ("W1", WritType::Bail);
    let payload = NewProceeding {
        fir: target.id.clone(),
        hearing_details: shared::domain::HearingDetails {
            date_of_hearing: Some(day("2024-06-01")),
            judge_name: " Justice Mehta ".into(),
            court_number: "12".into(),
        },
        summary: None,
        draft: false,
        draft_id: None,
        details: ProceedingDetails::Argument(ArgumentDetails {
            details: "Points on delay".into(),
            next_date_of_hearing: None,
        }),
    };

    let mut form = ProceedingForm::from_payload(&target, &payload);
    assert_eq!(form.kind(), Some(ProceedingKind::NoticeOfMotion));
    assert!(form.validate().is_err());

    form.continue_draft(shared::domain::ProceedingId::new("draft-9"));
    form.set_kind(ProceedingKind::AnyOther);
    form.any_other.details = "Converted".into();
    let submission = form.validate().expect("valid");
    assert_eq!(submission.payload.hearing_details.judge_name, "Justice Mehta");
    assert_eq!(
        submission.payload.draft_id.as_ref().map(|id| id.to_string()),
        Some("draft-9".into())
    );
    assert_eq!(submission.resumed_draft.map(|id| id.to_string()), Some("draft-9".into()));
}

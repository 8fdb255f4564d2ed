//! Mail Templates - 알림 종류별 제목/본문

use politeia_foundation::{ProposalRecord, User};

/// 제안서 링크
pub fn proposal_link(web_server_address: &str, token: &str) -> String {
    format!(
        "{}/proposals/{}",
        web_server_address.trim_end_matches('/'),
        token
    )
}

pub fn admins_new_proposal(link: &str, name: &str, username: &str, email: &str) -> (String, String) {
    (
        "New Proposal Submitted".to_string(),
        format!(
            "A new proposal has been submitted on Politeia by {} ({}):\n\n{}\n{}\n",
            username, email, name, link
        ),
    )
}

pub fn author_proposal_vetted(link: &str, proposal: &ProposalRecord) -> (String, String) {
    (
        "Your Proposal Has Been Published".to_string(),
        format!(
            "Your proposal has just been approved on Politeia!\n\n\
             You will need to authorize a proposal vote before an administrator will be \
             allowed to start the voting period on your proposal.\n\n{}\n{}\n",
            proposal.name, link
        ),
    )
}

pub fn users_proposal_vetted(link: &str, proposal: &ProposalRecord, author: &User) -> (String, String) {
    (
        "New Proposal Published".to_string(),
        format!(
            "A new proposal has just been published on Politeia.\n\n{}\nby {}\n{}\n",
            proposal.name, author.username, link
        ),
    )
}

pub fn author_proposal_censored(link: &str, proposal: &ProposalRecord, reason: &str) -> (String, String) {
    (
        "Your Proposal Has Been Censored".to_string(),
        format!(
            "Your proposal on Politeia has been censored:\n\n{}\n{}\nReason: {}\n",
            proposal.name, link, reason
        ),
    )
}

pub fn users_proposal_edited(link: &str, proposal: &ProposalRecord, author: &User) -> (String, String) {
    (
        "Proposal Edited".to_string(),
        format!(
            "A proposal by {} has just been edited:\n\n{}\nVersion: {}\n{}\n",
            author.username, proposal.name, proposal.version, link
        ),
    )
}

pub fn author_vote_started(link: &str, proposal: &ProposalRecord) -> (String, String) {
    (
        "Voting Started for Your Proposal".to_string(),
        format!(
            "Voting has just started for your proposal on Politeia!\n\n{}\n{}\n",
            proposal.name, link
        ),
    )
}

pub fn users_vote_started(link: &str, proposal: &ProposalRecord) -> (String, String) {
    (
        "Voting Started for Proposal".to_string(),
        format!(
            "Voting has just started for this proposal on Politeia!\n\n{}\n{}\n",
            proposal.name, link
        ),
    )
}

pub fn admins_vote_authorized(link: &str, proposal: &ProposalRecord, author: &User) -> (String, String) {
    (
        "Proposal Authorized To Start Voting".to_string(),
        format!(
            "{} has authorized the voting period to start for:\n\n{}\n{}\n",
            author.username, proposal.name, link
        ),
    )
}

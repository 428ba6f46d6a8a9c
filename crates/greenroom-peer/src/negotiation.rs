use serde::{Deserialize, Serialize};
use tracing::debug;

/// Local signaling state, mirroring the three states the protocol needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalingState {
    Stable,
    HaveLocalOffer,
    HaveRemoteOffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionKind {
    Offer,
    Answer,
}

/// An opaque session description. The machine never inspects `sdp`; it only
/// tracks which side produced it and whether it is an offer or an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: DescriptionKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: DescriptionKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: DescriptionKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// What to do with an incoming offer.
#[derive(Debug, Clone, PartialEq)]
pub enum OfferDisposition {
    /// Glare, and this endpoint is impolite: drop the remote offer and keep
    /// our own in flight.
    Ignored,
    /// Apply the remote offer; `candidates` are buffered candidates now
    /// ready to apply. `rolled_back` is set when a polite endpoint discarded
    /// its own in-flight offer first.
    Accepted {
        rolled_back: bool,
        candidates: Vec<serde_json::Value>,
    },
}

/// What to do with an incoming answer.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerDisposition {
    /// Apply it; `candidates` are buffered candidates now ready to apply.
    Applied { candidates: Vec<serde_json::Value> },
    /// No offer outstanding: a stale or duplicate answer.
    Ignored,
}

/// Deterministic glare resolution between exactly two endpoints.
///
/// The impolite side never yields an in-flight offer; the polite side rolls
/// back and answers. Simultaneous offers therefore always converge on the
/// impolite endpoint's description, with no out-of-band collision
/// detection.
#[derive(Debug, Clone)]
pub struct Negotiator {
    polite: bool,
    state: SignalingState,
    making_offer: bool,
    local: Option<SessionDescription>,
    remote: Option<SessionDescription>,
    pending_candidates: Vec<serde_json::Value>,
}

impl Negotiator {
    pub fn new(polite: bool) -> Self {
        Self {
            polite,
            state: SignalingState::Stable,
            making_offer: false,
            local: None,
            remote: None,
            pending_candidates: Vec::new(),
        }
    }

    pub fn is_polite(&self) -> bool {
        self.polite
    }

    pub fn state(&self) -> SignalingState {
        self.state
    }

    pub fn local_description(&self) -> Option<&SessionDescription> {
        self.local.as_ref()
    }

    pub fn remote_description(&self) -> Option<&SessionDescription> {
        self.remote.as_ref()
    }

    /// Whether a new negotiation attempt may start right now. Offers are
    /// only created from `Stable`, and a second attempt while one is in
    /// flight is suppressed.
    pub fn can_offer(&self) -> bool {
        self.state == SignalingState::Stable && !self.making_offer
    }

    /// Take a freshly created local offer in flight. Returns the
    /// description to send, or `None` when the attempt is suppressed.
    pub fn start_offer(&mut self, offer: SessionDescription) -> Option<SessionDescription> {
        if !self.can_offer() || offer.kind != DescriptionKind::Offer {
            debug!(state = ?self.state, "offer attempt suppressed");
            return None;
        }
        self.making_offer = true;
        self.state = SignalingState::HaveLocalOffer;
        self.local = Some(offer.clone());
        Some(offer)
    }

    /// Handle an offer from the remote peer, resolving glare by role.
    pub fn on_remote_offer(&mut self, offer: SessionDescription) -> OfferDisposition {
        let collision = self.making_offer || self.state != SignalingState::Stable;

        if collision {
            if !self.polite {
                debug!("glare: impolite endpoint ignoring remote offer");
                return OfferDisposition::Ignored;
            }
            // Polite: discard our own in-flight offer before applying theirs.
            debug!("glare: polite endpoint rolling back local offer");
            self.local = None;
            self.making_offer = false;
        }

        let rolled_back = collision;
        self.remote = Some(offer);
        self.state = SignalingState::HaveRemoteOffer;
        OfferDisposition::Accepted {
            rolled_back,
            candidates: self.drain_pending(),
        }
    }

    /// Take the local answer to a previously accepted remote offer.
    /// Returns the description to send, or `None` when no remote offer is
    /// pending.
    pub fn answer_with(&mut self, answer: SessionDescription) -> Option<SessionDescription> {
        if self.state != SignalingState::HaveRemoteOffer
            || answer.kind != DescriptionKind::Answer
        {
            return None;
        }
        self.local = Some(answer.clone());
        self.state = SignalingState::Stable;
        Some(answer)
    }

    /// Handle an answer from the remote peer. Applied only while our own
    /// offer is outstanding; anything else is stale and dropped.
    pub fn on_remote_answer(&mut self, answer: SessionDescription) -> AnswerDisposition {
        if self.state != SignalingState::HaveLocalOffer {
            debug!(state = ?self.state, "stale answer ignored");
            return AnswerDisposition::Ignored;
        }
        self.remote = Some(answer);
        self.state = SignalingState::Stable;
        self.making_offer = false;
        AnswerDisposition::Applied {
            candidates: self.drain_pending(),
        }
    }

    /// Handle a trickled candidate. Returns it when a remote description is
    /// already set (apply immediately); otherwise buffers it until one is,
    /// at which point it comes back out of the accept/apply disposition.
    pub fn on_remote_candidate(&mut self, candidate: serde_json::Value) -> Option<serde_json::Value> {
        if self.remote.is_some() {
            Some(candidate)
        } else {
            self.pending_candidates.push(candidate);
            None
        }
    }

    /// The offer both sides settled on, once negotiation is back to
    /// `Stable`. On the impolite side this is the local description; on the
    /// polite side the remote one.
    pub fn agreed_offer(&self) -> Option<&str> {
        if self.state != SignalingState::Stable {
            return None;
        }
        [self.local.as_ref(), self.remote.as_ref()]
            .into_iter()
            .flatten()
            .find(|d| d.kind == DescriptionKind::Offer)
            .map(|d| d.sdp.as_str())
    }

    fn drain_pending(&mut self) -> Vec<serde_json::Value> {
        std::mem::take(&mut self.pending_candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn offer_only_starts_from_stable() {
        let mut n = Negotiator::new(false);
        assert!(n.can_offer());
        assert!(n.start_offer(SessionDescription::offer("sdp-1")).is_some());
        assert_eq!(n.state(), SignalingState::HaveLocalOffer);

        // Concurrent attempt suppressed while one is in flight.
        assert!(!n.can_offer());
        assert!(n.start_offer(SessionDescription::offer("sdp-2")).is_none());
    }

    #[test]
    fn stable_endpoint_accepts_and_answers() {
        let mut n = Negotiator::new(true);
        let disposition = n.on_remote_offer(SessionDescription::offer("their-offer"));
        assert!(matches!(
            disposition,
            OfferDisposition::Accepted {
                rolled_back: false,
                ..
            }
        ));
        assert_eq!(n.state(), SignalingState::HaveRemoteOffer);

        let sent = n.answer_with(SessionDescription::answer("my-answer"));
        assert!(sent.is_some());
        assert_eq!(n.state(), SignalingState::Stable);
        assert_eq!(n.agreed_offer(), Some("their-offer"));
    }

    #[test]
    fn glare_resolves_to_impolite_offer_on_both_sides() {
        // HR side (impolite) and candidate side (polite) offer simultaneously.
        let mut hr = Negotiator::new(false);
        let mut candidate = Negotiator::new(true);

        let hr_offer = hr.start_offer(SessionDescription::offer("hr-offer")).unwrap();
        let cand_offer = candidate
            .start_offer(SessionDescription::offer("cand-offer"))
            .unwrap();

        // Crossing on the wire: each receives the other's offer mid-flight.
        assert_eq!(hr.on_remote_offer(cand_offer), OfferDisposition::Ignored);
        assert!(matches!(
            candidate.on_remote_offer(hr_offer),
            OfferDisposition::Accepted {
                rolled_back: true,
                ..
            }
        ));

        let answer = candidate
            .answer_with(SessionDescription::answer("cand-answer"))
            .unwrap();
        assert!(matches!(
            hr.on_remote_answer(answer),
            AnswerDisposition::Applied { .. }
        ));

        // Both sides converged on the impolite endpoint's description.
        assert_eq!(hr.state(), SignalingState::Stable);
        assert_eq!(candidate.state(), SignalingState::Stable);
        assert_eq!(hr.agreed_offer(), Some("hr-offer"));
        assert_eq!(candidate.agreed_offer(), Some("hr-offer"));
    }

    #[test]
    fn stale_answer_is_ignored() {
        let mut n = Negotiator::new(false);
        assert_eq!(
            n.on_remote_answer(SessionDescription::answer("stale")),
            AnswerDisposition::Ignored
        );
        assert_eq!(n.state(), SignalingState::Stable);
        assert!(n.remote_description().is_none());

        // A duplicate answer after convergence is also dropped.
        n.start_offer(SessionDescription::offer("o")).unwrap();
        n.on_remote_answer(SessionDescription::answer("a"));
        assert_eq!(
            n.on_remote_answer(SessionDescription::answer("a-again")),
            AnswerDisposition::Ignored
        );
    }

    #[test]
    fn candidates_buffer_until_remote_description() {
        let mut n = Negotiator::new(true);

        // No remote description yet: buffered, not applied.
        assert!(n.on_remote_candidate(json!({"candidate": "c1"})).is_none());
        assert!(n.on_remote_candidate(json!({"candidate": "c2"})).is_none());

        // Accepting the offer flushes the buffer in arrival order.
        match n.on_remote_offer(SessionDescription::offer("o")) {
            OfferDisposition::Accepted { candidates, .. } => {
                assert_eq!(
                    candidates,
                    vec![json!({"candidate": "c1"}), json!({"candidate": "c2"})]
                );
            }
            other => panic!("unexpected disposition: {other:?}"),
        }

        // With a remote description set, candidates apply immediately.
        assert!(n.on_remote_candidate(json!({"candidate": "c3"})).is_some());
    }

    #[test]
    fn candidates_buffer_on_offering_side_until_answer() {
        let mut n = Negotiator::new(false);
        n.start_offer(SessionDescription::offer("o")).unwrap();

        assert!(n.on_remote_candidate(json!({"candidate": "c1"})).is_none());
        match n.on_remote_answer(SessionDescription::answer("a")) {
            AnswerDisposition::Applied { candidates } => {
                assert_eq!(candidates, vec![json!({"candidate": "c1"})]);
            }
            AnswerDisposition::Ignored => panic!("answer should apply"),
        }
    }

    #[test]
    fn renegotiation_after_convergence() {
        let mut hr = Negotiator::new(false);
        let mut candidate = Negotiator::new(true);

        // First round: clean offer/answer.
        let offer = hr.start_offer(SessionDescription::offer("v1")).unwrap();
        candidate.on_remote_offer(offer);
        let answer = candidate
            .answer_with(SessionDescription::answer("v1-answer"))
            .unwrap();
        hr.on_remote_answer(answer);

        // Both stable again, so either side may renegotiate.
        assert!(hr.can_offer());
        assert!(candidate.can_offer());

        let offer = candidate
            .start_offer(SessionDescription::offer("v2"))
            .unwrap();
        assert!(matches!(
            hr.on_remote_offer(offer),
            OfferDisposition::Accepted {
                rolled_back: false,
                ..
            }
        ));
        let answer = hr.answer_with(SessionDescription::answer("v2-answer")).unwrap();
        candidate.on_remote_answer(answer);

        assert_eq!(hr.agreed_offer(), Some("v2"));
        assert_eq!(candidate.agreed_offer(), Some("v2"));
    }
}

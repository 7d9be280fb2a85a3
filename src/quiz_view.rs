use crate::quiz::Quiz;
use crate::utils;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlButtonElement, HtmlElement, MouseEvent};

const QUESTION_VIEW_ID: &str = "question-view";
const RESULT_VIEW_ID: &str = "result-view";
const QUESTION_TEXT_ID: &str = "question-text";
const ANSWER_BUTTONS_ID: &str = "answer-buttons";
const SCORE_VALUE_ID: &str = "score-value";
const FINAL_SCORE_ID: &str = "final-score";
const TOTAL_QUESTIONS_ID: &str = "total-questions";
const RESTART_BUTTON_ID: &str = "restart-button";
const ANSWER_BUTTON_CLASS: &str = "answer-btn";

/// Binds a [`Quiz`] to the question/result panels of a quiz page.
pub struct QuizView {
    document: Document,
    question_view: HtmlElement,
    result_view: HtmlElement,
    question_text: HtmlElement,
    answer_buttons: HtmlElement,
    score_value: HtmlElement,
    final_score: HtmlElement,
    total_questions: HtmlElement,
    restart_button: HtmlElement,
    quiz: RefCell<Quiz>,
}

impl QuizView {
    pub fn new(quiz: Quiz) -> Result<Rc<Self>, JsValue> {
        let document = utils::document()?;
        let view = Self {
            question_view: utils::element_by_id(&document, QUESTION_VIEW_ID)?,
            result_view: utils::element_by_id(&document, RESULT_VIEW_ID)?,
            question_text: utils::element_by_id(&document, QUESTION_TEXT_ID)?,
            answer_buttons: utils::element_by_id(&document, ANSWER_BUTTONS_ID)?,
            score_value: utils::element_by_id(&document, SCORE_VALUE_ID)?,
            final_score: utils::element_by_id(&document, FINAL_SCORE_ID)?,
            total_questions: utils::element_by_id(&document, TOTAL_QUESTIONS_ID)?,
            restart_button: utils::element_by_id(&document, RESTART_BUTTON_ID)?,
            document,
            quiz: RefCell::new(quiz),
        };
        Ok(Rc::new(view))
    }

    pub fn install(self: &Rc<Self>) -> Result<(), JsValue> {
        let restart_view = Rc::clone(self);
        let restart_closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
            if let Err(err) = restart_view.restart() {
                utils::log(&format!("Failed to restart quiz: {err:?}"));
            }
        }) as Box<dyn FnMut(_)>);
        self.restart_button.add_event_listener_with_callback(
            "click",
            restart_closure.as_ref().unchecked_ref(),
        )?;
        restart_closure.forget();

        self.update_score();
        if self.quiz.borrow().is_ended() {
            self.show_results()
        } else {
            self.display_question()
        }
    }

    pub fn display_question(self: &Rc<Self>) -> Result<(), JsValue> {
        self.answer_buttons.set_inner_html("");

        let quiz = self.quiz.borrow();
        let Some(question) = quiz.current_question() else {
            return Ok(());
        };
        self.question_text
            .set_text_content(Some(question.question.as_str()));

        for (index, answer) in question.answers.iter().enumerate() {
            let button = self
                .document
                .create_element("button")?
                .dyn_into::<HtmlButtonElement>()?;
            button.set_text_content(Some(answer.as_str()));
            button.class_list().add_1(ANSWER_BUTTON_CLASS)?;

            let click_view = Rc::clone(self);
            let click_closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                if let Err(err) = click_view.handle_answer_click(index) {
                    utils::log(&format!("Failed to record quiz answer: {err:?}"));
                }
            }) as Box<dyn FnMut(_)>);
            button.add_event_listener_with_callback(
                "click",
                click_closure.as_ref().unchecked_ref(),
            )?;
            click_closure.forget();

            self.answer_buttons.append_child(&button)?;
        }
        Ok(())
    }

    fn handle_answer_click(self: &Rc<Self>, answer_index: usize) -> Result<(), JsValue> {
        let ended = {
            let mut quiz = self.quiz.borrow_mut();
            quiz.submit_answer(answer_index);
            quiz.is_ended()
        };
        self.update_score();

        if ended {
            self.show_results()
        } else {
            self.display_question()
        }
    }

    fn update_score(&self) {
        let score = self.quiz.borrow().score().to_string();
        self.score_value.set_text_content(Some(score.as_str()));
    }

    fn show_results(&self) -> Result<(), JsValue> {
        self.question_view.style().set_property("display", "none")?;
        self.result_view.style().set_property("display", "block")?;
        let quiz = self.quiz.borrow();
        let score = quiz.score().to_string();
        let total = quiz.total_questions().to_string();
        self.final_score.set_text_content(Some(score.as_str()));
        self.total_questions.set_text_content(Some(total.as_str()));
        Ok(())
    }

    fn restart(self: &Rc<Self>) -> Result<(), JsValue> {
        self.quiz.borrow_mut().reset();
        self.result_view.style().set_property("display", "none")?;
        self.question_view.style().set_property("display", "block")?;
        self.update_score();
        self.display_question()
    }
}
